//! Inventory service: item and category management.
//!
//! Categories follow upsert-on-reference semantics: creating or updating an
//! item with an unknown category name silently creates that category.

use crate::{
    config::InventoryConfig,
    error::{AppError, AppResult},
    models::{
        category::{Category, CategoryWithCount, CreateCategory, UpdateCategory},
        item::{BatchUpdateEntry, CreateItem, ItemDetails, ItemQuery, UpdateItem},
    },
    repository::Repository,
};

const AUTO_CATEGORY_DESCRIPTION: &str = "Automatically created category";

#[derive(Clone)]
pub struct InventoryService {
    repository: Repository,
    config: InventoryConfig,
}

impl InventoryService {
    pub fn new(repository: Repository, config: InventoryConfig) -> Self {
        Self { repository, config }
    }

    // =========================================================================
    // ITEMS
    // =========================================================================

    /// Get a single item
    pub async fn get_item(&self, id: i32) -> AppResult<ItemDetails> {
        Ok(self.repository.items.get_by_id(id).await?.into())
    }

    /// List items with filters
    pub async fn list_items(&self, query: &ItemQuery) -> AppResult<Vec<ItemDetails>> {
        let items = self.repository.items.list(query).await?;
        Ok(items.into_iter().map(Into::into).collect())
    }

    /// Create an item, auto-creating its category when unknown
    pub async fn create_item(&self, item: &CreateItem) -> AppResult<ItemDetails> {
        let category = item
            .category
            .clone()
            .unwrap_or_else(|| self.config.default_category.clone());

        self.repository
            .categories
            .ensure(&category, AUTO_CATEGORY_DESCRIPTION)
            .await?;

        let created = self.repository.items.create(item, &category).await?;

        tracing::info!(item_id = created.id, name = %created.name, "Item created");

        Ok(created.into())
    }

    /// Update an item, auto-creating a newly referenced category
    pub async fn update_item(&self, id: i32, changes: &UpdateItem) -> AppResult<ItemDetails> {
        if let Some(ref category) = changes.category {
            self.repository
                .categories
                .ensure(category, AUTO_CATEGORY_DESCRIPTION)
                .await?;
        }

        let updated = self.repository.items.update(id, changes).await?;
        Ok(updated.into())
    }

    /// Delete an item unless stock is still out on loan under it
    pub async fn delete_item(&self, id: i32) -> AppResult<()> {
        // Guard: the item row must not disappear under an active reservation
        let active = self.repository.requests.count_active_for_item(id).await?;
        if active > 0 {
            return Err(AppError::Conflict(format!(
                "Item {} still has {} unreturned request(s)",
                id, active
            )));
        }

        self.repository.items.delete(id).await?;

        tracing::info!(item_id = id, "Item deleted");

        Ok(())
    }

    /// Create several items; invalid entries are collected as error messages
    /// and do not abort the rest of the batch
    pub async fn batch_create_items(
        &self,
        items: &[CreateItem],
    ) -> AppResult<(i64, Vec<String>)> {
        use validator::Validate;

        let mut added = 0;
        let mut errors = Vec::new();

        for (idx, item) in items.iter().enumerate() {
            if let Err(e) = item.validate() {
                errors.push(format!("Entry {}: {}", idx + 1, e));
                continue;
            }

            match self.create_item(item).await {
                Ok(_) => added += 1,
                Err(e @ AppError::Database(_)) => return Err(e),
                Err(e) => errors.push(format!("Entry {}: {}", idx + 1, e)),
            }
        }

        Ok((added, errors))
    }

    /// Update several items; missing ids are skipped
    pub async fn batch_update_items(&self, entries: &[BatchUpdateEntry]) -> AppResult<i64> {
        let mut updated = 0;

        for entry in entries {
            match self.update_item(entry.id, &entry.changes).await {
                Ok(_) => updated += 1,
                Err(e @ AppError::Database(_)) => return Err(e),
                Err(e) => {
                    tracing::debug!(item_id = entry.id, error = %e, "Skipped in batch update");
                }
            }
        }

        Ok(updated)
    }

    /// Delete several items. Refuses the whole batch if any listed item has
    /// unreturned requests.
    pub async fn batch_delete_items(&self, ids: &[i32]) -> AppResult<i64> {
        for &id in ids {
            let active = self.repository.requests.count_active_for_item(id).await?;
            if active > 0 {
                return Err(AppError::Conflict(format!(
                    "Item {} still has unreturned requests",
                    id
                )));
            }
        }

        let mut deleted = 0;
        for &id in ids {
            match self.repository.items.delete(id).await {
                Ok(()) => deleted += 1,
                Err(AppError::NotFound(_)) => {}
                Err(e) => return Err(e),
            }
        }

        Ok(deleted)
    }

    // =========================================================================
    // CATEGORIES
    // =========================================================================

    /// List categories with item counts
    pub async fn list_categories(&self) -> AppResult<Vec<CategoryWithCount>> {
        self.repository.categories.list_with_counts().await
    }

    /// Create a category explicitly; duplicate names are refused
    pub async fn create_category(&self, category: &CreateCategory) -> AppResult<Category> {
        self.repository
            .categories
            .create(&category.name, category.description.as_deref())
            .await
    }

    /// Update a category; renaming cascades the new name to its items
    pub async fn update_category(&self, id: i32, changes: &UpdateCategory) -> AppResult<Category> {
        let category = self.repository.categories.get_by_id(id).await?;

        if let Some(ref new_name) = changes.name {
            if new_name.is_empty() {
                return Err(AppError::InvalidArgument(
                    "Category name must not be empty".to_string(),
                ));
            }
            if *new_name != category.name {
                if self.repository.categories.get_by_name(new_name).await?.is_some() {
                    return Err(AppError::Conflict(format!(
                        "Category '{}' already exists",
                        new_name
                    )));
                }
                let moved = self
                    .repository
                    .items
                    .rename_category(&category.name, new_name)
                    .await?;
                tracing::info!(
                    category = %category.name,
                    new_name = %new_name,
                    items_moved = moved,
                    "Category renamed"
                );
            }
        }

        self.repository
            .categories
            .update(id, changes.name.as_deref(), changes.description.as_deref())
            .await
    }

    /// Delete a category; refused for the default category or while items
    /// still reference it
    pub async fn delete_category(&self, id: i32) -> AppResult<()> {
        let category = self.repository.categories.get_by_id(id).await?;

        if category.name == self.config.default_category {
            return Err(AppError::Conflict(
                "Category is the default category and cannot be deleted".to_string(),
            ));
        }

        let item_count = self.repository.items.count_by_category(&category.name).await?;
        if item_count > 0 {
            return Err(AppError::Conflict(format!(
                "Category '{}' still has {} item(s)",
                category.name, item_count
            )));
        }

        self.repository.categories.delete(id).await
    }
}
