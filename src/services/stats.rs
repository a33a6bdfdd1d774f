//! Statistics and export service

use std::collections::HashMap;

use chrono::{Duration, Utc};

use crate::{
    api::stats::{
        CategoryStatEntry, ExportType, ItemStatsResponse, RequestStats, StatEntry, StatsResponse,
        TrendEntry,
    },
    error::AppResult,
    models::{item::ItemDetails, request::RequestDetails},
    repository::Repository,
};

#[derive(Clone)]
pub struct StatsService {
    repository: Repository,
}

impl StatsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// System overview: stock totals, request counts, submission trend
    pub async fn overview(&self) -> AppResult<StatsResponse> {
        let total_items = self.repository.items.count().await?;
        let (total_stock, current_stock) = self.repository.items.stock_totals().await?;

        let mut request_stats = RequestStats::default();
        for (status, count) in self.repository.requests.count_by_status().await? {
            match status.as_str() {
                "pending" => request_stats.pending = count,
                "approved" => request_stats.approved = count,
                "rejected" => request_stats.rejected = count,
                "returned" => request_stats.returned = count,
                "partially_returned" => request_stats.partially_returned = count,
                _ => {}
            }
        }

        // Zero-fill the last seven days, newest first
        let submissions: HashMap<String, i64> = self
            .repository
            .requests
            .daily_submissions(7)
            .await?
            .into_iter()
            .collect();

        let today = Utc::now().date_naive();
        let weekly_trend: Vec<TrendEntry> = (0..7i64)
            .map(|i| {
                let date = (today - Duration::days(i)).format("%Y-%m-%d").to_string();
                let count = submissions.get(&date).copied().unwrap_or(0);
                TrendEntry { date, count }
            })
            .collect();

        let category_stats = self
            .repository
            .items
            .stock_by_category()
            .await?
            .into_iter()
            .map(|row| StatEntry {
                label: row.category,
                value: row.item_count,
            })
            .collect();

        Ok(StatsResponse {
            total_items,
            total_stock,
            current_stock,
            on_loan: total_stock - current_stock,
            request_stats,
            weekly_trend,
            category_stats,
        })
    }

    /// Item quantity totals with per-category breakdown
    pub async fn item_stats(&self) -> AppResult<ItemStatsResponse> {
        let total_items = self.repository.items.count().await?;
        let (total_quantity, available_quantity) = self.repository.items.stock_totals().await?;

        let category_stats = self
            .repository
            .items
            .stock_by_category()
            .await?
            .into_iter()
            .map(|row| CategoryStatEntry {
                category: row.category,
                item_count: row.item_count,
                total_quantity: row.total_quantity,
                available_quantity: row.available_quantity,
                borrowed_quantity: row.total_quantity - row.available_quantity,
            })
            .collect();

        Ok(ItemStatsResponse {
            total_items,
            total_quantity,
            available_quantity,
            borrowed_quantity: total_quantity - available_quantity,
            category_stats,
        })
    }

    /// Export system data as a single JSON document
    pub async fn export(&self, export_type: ExportType) -> AppResult<serde_json::Value> {
        let mut data = serde_json::json!({
            "export_type": export_type,
            "export_time": Utc::now().to_rfc3339(),
            "version": env!("CARGO_PKG_VERSION"),
        });

        if matches!(export_type, ExportType::All | ExportType::Items) {
            let items: Vec<ItemDetails> = self
                .repository
                .items
                .list_all()
                .await?
                .into_iter()
                .map(Into::into)
                .collect();
            data["items"] = serde_json::to_value(items)
                .map_err(|e| crate::error::AppError::Internal(e.to_string()))?;
        }

        if matches!(export_type, ExportType::All | ExportType::Requests) {
            let requests: Vec<RequestDetails> = self
                .repository
                .requests
                .list_all()
                .await?
                .into_iter()
                .map(Into::into)
                .collect();
            data["requests"] = serde_json::to_value(requests)
                .map_err(|e| crate::error::AppError::Internal(e.to_string()))?;
        }

        if matches!(export_type, ExportType::All | ExportType::Categories) {
            let categories = self.repository.categories.list_all().await?;
            data["categories"] = serde_json::to_value(categories)
                .map_err(|e| crate::error::AppError::Internal(e.to_string()))?;
        }

        Ok(data)
    }
}
