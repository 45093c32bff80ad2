fn main() -> Result<(), eframe::Error> {
    railadmin_frontend::run_frontend()
}
