use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set,
};

use crate::entities::model::{self, Entity as Models};

/// Sole gateway to the `models` table. Holds the connection opened at
/// startup; every mutation is a single-row UPDATE keyed by id and reports
/// how many rows it touched, so callers can tell not-found apart from
/// storage failures.
#[derive(Clone)]
pub struct CatalogRepository {
    db: DatabaseConnection,
}

impl CatalogRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Non-deleted records, newest first. A non-empty search term filters
    /// by case-insensitive substring match on the title.
    pub async fn list_models(&self, search: Option<&str>) -> Result<Vec<model::Model>, DbErr> {
        let mut query = Models::find().filter(model::Column::IsDeleted.eq(false));

        if let Some(term) = search.filter(|term| !term.is_empty()) {
            query = query.filter(model::Column::Title.contains(term));
        }

        query
            .order_by_desc(model::Column::CreatedAt)
            .order_by_desc(model::Column::Id)
            .all(&self.db)
            .await
    }

    pub async fn get_model(&self, id: i32) -> Result<Option<model::Model>, DbErr> {
        Models::find_by_id(id)
            .filter(model::Column::IsDeleted.eq(false))
            .one(&self.db)
            .await
    }

    /// Inserts a new record. The insert counts as the first mutation, so
    /// `updated_at` is set alongside `created_at`.
    pub async fn create_model(
        &self,
        title: &str,
        original_name: &str,
        file_path: &str,
    ) -> Result<model::Model, DbErr> {
        let now = chrono::Utc::now().naive_utc();
        let record = model::ActiveModel {
            title: Set(Some(title.to_owned())),
            original_name: Set(original_name.to_owned()),
            file_path: Set(file_path.to_owned()),
            created_at: Set(now),
            updated_at: Set(Some(now)),
            is_deleted: Set(false),
            ..Default::default()
        };

        record.insert(&self.db).await
    }

    pub async fn replace_file(
        &self,
        id: i32,
        original_name: &str,
        file_path: &str,
    ) -> Result<u64, DbErr> {
        let result = Models::update_many()
            .col_expr(model::Column::OriginalName, Expr::value(original_name))
            .col_expr(model::Column::FilePath, Expr::value(file_path))
            .col_expr(
                model::Column::UpdatedAt,
                Expr::value(Some(chrono::Utc::now().naive_utc())),
            )
            .filter(model::Column::Id.eq(id))
            .filter(model::Column::IsDeleted.eq(false))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected)
    }

    pub async fn rename_title(&self, id: i32, title: &str) -> Result<u64, DbErr> {
        let result = Models::update_many()
            .col_expr(model::Column::Title, Expr::value(Some(title.to_owned())))
            .col_expr(
                model::Column::UpdatedAt,
                Expr::value(Some(chrono::Utc::now().naive_utc())),
            )
            .filter(model::Column::Id.eq(id))
            .filter(model::Column::IsDeleted.eq(false))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected)
    }

    pub async fn attach_usdz(&self, id: i32, usdz_path: &str) -> Result<u64, DbErr> {
        let result = Models::update_many()
            .col_expr(model::Column::UsdzPath, Expr::value(Some(usdz_path.to_owned())))
            .col_expr(
                model::Column::UpdatedAt,
                Expr::value(Some(chrono::Utc::now().naive_utc())),
            )
            .filter(model::Column::Id.eq(id))
            .filter(model::Column::IsDeleted.eq(false))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected)
    }

    pub async fn attach_thumbnail(&self, id: i32, thumbnail_path: &str) -> Result<u64, DbErr> {
        let result = Models::update_many()
            .col_expr(
                model::Column::ThumbnailPath,
                Expr::value(Some(thumbnail_path.to_owned())),
            )
            .col_expr(
                model::Column::UpdatedAt,
                Expr::value(Some(chrono::Utc::now().naive_utc())),
            )
            .filter(model::Column::Id.eq(id))
            .filter(model::Column::IsDeleted.eq(false))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected)
    }

    /// Soft delete: flips the flag, keeps the row and its files on disk.
    /// A second call reports zero rows, same as a missing id.
    pub async fn soft_delete(&self, id: i32) -> Result<u64, DbErr> {
        let result = Models::update_many()
            .col_expr(model::Column::IsDeleted, Expr::value(true))
            .col_expr(
                model::Column::UpdatedAt,
                Expr::value(Some(chrono::Utc::now().naive_utc())),
            )
            .filter(model::Column::Id.eq(id))
            .filter(model::Column::IsDeleted.eq(false))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected)
    }
}
