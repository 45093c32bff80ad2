//! Sidebar navigation: the link table, active-route matching, the
//! announcements submenu and the branding-driven theme context.

use log::{error, info};

use crate::models::BrandingSettings;
use crate::theme::ThemeContext;

pub const DASHBOARD_ROUTE: &str = "/admin";
pub const NEWS_ROUTE: &str = "/admin/gestion-actualites";
pub const LOGIN_ROUTE: &str = "/admin/login";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavLink {
    pub label: &'static str,
    pub path: &'static str,
    pub icon: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavEntry {
    Link(NavLink),
    /// Collapsible group; its open state is [`NavigationShell::announcements_open`].
    Group {
        label: &'static str,
        icon: &'static str,
        links: &'static [NavLink],
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavSection {
    pub title: Option<&'static str>,
    pub entries: &'static [NavEntry],
}

const fn link(label: &'static str, path: &'static str, icon: &'static str) -> NavEntry {
    NavEntry::Link(NavLink { label, path, icon })
}

const ANNOUNCEMENT_LINKS: &[NavLink] = &[
    NavLink {
        label: "Banque de sons",
        path: "/admin/banque-de-sons",
        icon: "🎵",
    },
    NavLink {
        label: "Conception annonce",
        path: "/admin/conception-annonce",
        icon: "✏",
    },
    NavLink {
        label: "Liste annonces",
        path: "/admin/liste-annonces",
        icon: "☰",
    },
];

pub const NAV_SECTIONS: &[NavSection] = &[
    NavSection {
        title: None,
        entries: &[link("Dashboard", DASHBOARD_ROUTE, "🏠")],
    },
    NavSection {
        title: Some("Gestion"),
        entries: &[
            link("Entreprise", "/admin/entreprise", "🏢"),
            link("Gestion de gares", "/admin/stations", "🚉"),
            link("Matériels Roulants", "/admin/materiels-roulants", "⚙"),
            link("Gestion de la Billetique", "/admin/billetique", "🎫"),
            link("Compositions Trains", "/admin/compositions-trains", "🚆"),
        ],
    },
    NavSection {
        title: Some("Horaires & Trafic"),
        entries: &[
            link("Horaires", "/admin/horaires", "🕒"),
            link("Panneau de Contrôle", "/admin/gestion-horaires", "📅"),
            link("Gestion Actualités", NEWS_ROUTE, "📰"),
            link("Infos Trafic", "/admin/info-trafics", "ℹ"),
            link("Attribution Voie", "/admin/attribution-voie", "🔀"),
        ],
    },
    NavSection {
        title: Some("Annonces Sonores"),
        entries: &[NavEntry::Group {
            label: "Système d'annonces",
            icon: "📢",
            links: ANNOUNCEMENT_LINKS,
        }],
    },
    NavSection {
        title: Some("Système"),
        entries: &[
            link("Sauvegarde", "/admin/sauvegarde", "💾"),
            link("Profil Admin", "/admin/admin-profile", "👤"),
            link("Mise à jour", "/admin/update", "⟳"),
        ],
    },
];

pub const LOGOUT_LABEL: &str = "Déconnexion";

/// Exact match only: `/admin` is not active on `/admin/stations`.
pub fn is_active(link_path: &str, current_path: &str) -> bool {
    link_path == current_path
}

/// Looks a path up in the link table.
pub fn find_link(path: &str) -> Option<NavLink> {
    NAV_SECTIONS
        .iter()
        .flat_map(|section| section.entries.iter())
        .flat_map(|entry| match entry {
            NavEntry::Link(link) => std::slice::from_ref(link),
            NavEntry::Group { links, .. } => *links,
        })
        .find(|link| link.path == path)
        .copied()
}

/// State of the mounted sidebar. Dropping it unmounts the theme as well.
pub struct NavigationShell {
    current_path: String,
    announcements_open: bool,
    theme: ThemeContext,
    branding_requested: bool,
}

impl NavigationShell {
    pub fn mount(current_path: impl Into<String>) -> Self {
        Self {
            current_path: current_path.into(),
            announcements_open: false,
            theme: ThemeContext::new(BrandingSettings::default()),
            branding_requested: false,
        }
    }

    /// Drops the shell together with its theme context.
    pub fn unmount(self) {
        info!("navigation shell unmounted from {}", self.current_path);
    }

    pub fn current_path(&self) -> &str {
        &self.current_path
    }

    pub fn set_current_path(&mut self, path: impl Into<String>) {
        self.current_path = path.into();
    }

    pub fn is_active(&self, link: &NavLink) -> bool {
        is_active(link.path, &self.current_path)
    }

    pub fn announcements_open(&self) -> bool {
        self.announcements_open
    }

    pub fn toggle_announcements(&mut self) {
        self.announcements_open = !self.announcements_open;
    }

    pub fn theme(&self) -> &ThemeContext {
        &self.theme
    }

    pub fn theme_mut(&mut self) -> &mut ThemeContext {
        &mut self.theme
    }

    pub fn branding(&self) -> &BrandingSettings {
        self.theme.branding()
    }

    /// Returns `true` the first time only; the settings are read once per mount.
    pub fn take_branding_request(&mut self) -> bool {
        !std::mem::replace(&mut self.branding_requested, true)
    }

    /// Applies the result of the settings read. Failures and empty answers
    /// leave the current branding in place.
    pub fn apply_branding(&mut self, result: anyhow::Result<Option<BrandingSettings>>) -> bool {
        match result {
            Ok(Some(branding)) => {
                info!("branding loaded for {}", branding.company_name);
                self.theme.update(branding);
                true
            }
            Ok(None) => false,
            Err(err) => {
                error!("Failed to fetch entreprise settings: {err:#}");
                false
            }
        }
    }
}
