use crate::models::{NewsId, NewsPost};

/// Client-side copy of the server's post list. It is only ever rewritten
/// from server responses: a full listing, a created post, an updated post,
/// or a confirmed deletion.
#[derive(Debug, Default)]
pub struct PostCache {
    posts: Vec<NewsPost>,
}

impl PostCache {
    pub fn posts(&self) -> &[NewsPost] {
        &self.posts
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn get(&self, id: &NewsId) -> Option<&NewsPost> {
        self.posts.iter().find(|p| p.id.as_ref() == Some(id))
    }

    pub fn replace_all(&mut self, posts: Vec<NewsPost>) {
        self.posts = posts;
    }

    pub fn insert_created(&mut self, post: NewsPost) {
        self.posts.insert(0, post);
    }

    /// Replaces every entry whose id is `id` with the server's copy.
    pub fn apply_updated(&mut self, id: &NewsId, post: NewsPost) -> bool {
        let mut replaced = false;
        for slot in self.posts.iter_mut() {
            if slot.id.as_ref() == Some(id) {
                *slot = post.clone();
                replaced = true;
            }
        }
        replaced
    }

    pub fn remove(&mut self, id: &NewsId) -> bool {
        let before = self.posts.len();
        self.posts.retain(|p| p.id.as_ref() != Some(id));
        self.posts.len() != before
    }
}
