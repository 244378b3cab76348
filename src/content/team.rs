//! Executive profiles for the About section

use std::rc::Rc;

use super::error::ContentResult;
use super::types::{Executive, ExecutiveDraft};
use crate::backend::{
    fetch_all, to_row, upload_image, ContentStore, Direction, ImageFolder, ImageStore, Query, Table,
};

/// Reads and edits `executives`
#[derive(Clone)]
pub struct TeamManager {
    store: Rc<dyn ContentStore>,
    images: Rc<dyn ImageStore>,
}

impl TeamManager {
    pub fn new(store: Rc<dyn ContentStore>, images: Rc<dyn ImageStore>) -> Self {
        Self { store, images }
    }

    /// All executives in display order
    pub async fn list(&self) -> ContentResult<Vec<Executive>> {
        let query = Query::from(Table::Executives).order_by("order_index", Direction::Ascending);
        Ok(fetch_all(self.store.as_ref(), &query).await?)
    }

    pub async fn create(&self, draft: &ExecutiveDraft) -> ContentResult<()> {
        draft.validate()?;
        self.store.insert(Table::Executives, to_row(draft)?).await?;
        tracing::info!(name = %draft.name, order_index = draft.order_index, "Added executive");
        Ok(())
    }

    pub async fn update(&self, id: &str, draft: &ExecutiveDraft) -> ContentResult<()> {
        draft.validate()?;
        self.store.update(Table::Executives, id, to_row(draft)?).await?;
        tracing::info!(id = %id, "Updated executive");
        Ok(())
    }

    pub async fn delete(&self, id: &str) -> ContentResult<()> {
        self.store.delete(Table::Executives, id).await?;
        tracing::info!(id = %id, "Removed executive");
        Ok(())
    }

    /// Upload a portrait under `executives/`; returns its public URL
    pub async fn upload_image(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> ContentResult<String> {
        Ok(upload_image(
            self.images.as_ref(),
            ImageFolder::Executives,
            file_name,
            bytes,
            content_type,
        )
        .await?)
    }
}

/// Display position a new executive starts with: after everyone listed
pub fn next_order_index(executives: &[Executive]) -> i32 {
    i32::try_from(executives.len()).unwrap_or(i32::MAX)
}
