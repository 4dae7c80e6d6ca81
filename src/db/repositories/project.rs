use anyhow::{Context, Result};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};

use crate::db::new_id;
use crate::entities::projects;

pub struct ProjectRepository {
    conn: DatabaseConnection,
}

/// Fields an admin supplies when creating or editing a listing. Funding
/// progress is never set this way.
#[derive(Debug, Clone)]
pub struct ProjectInput {
    pub name: String,
    pub project_type: String,
    pub description: String,
    pub location: String,
    pub capacity: String,
    pub return_rate: f64,
    pub total_target: i64,
    pub image_url: String,
    pub details: String,
    pub status: String,
}

impl ProjectRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// All projects regardless of status, optionally narrowed to one
    /// generation type.
    pub async fn list(&self, project_type: Option<&str>) -> Result<Vec<projects::Model>> {
        let mut query = projects::Entity::find();

        if let Some(project_type) = project_type {
            query = query.filter(projects::Column::ProjectType.eq(project_type));
        }

        query
            .order_by_asc(projects::Column::Name)
            .all(&self.conn)
            .await
            .context("Failed to list projects")
    }

    pub async fn get(&self, id: &str) -> Result<Option<projects::Model>> {
        projects::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query project")
    }

    pub async fn create(&self, input: ProjectInput) -> Result<projects::Model> {
        let model = projects::ActiveModel {
            id: Set(new_id("prj")),
            name: Set(input.name),
            project_type: Set(input.project_type.to_uppercase()),
            description: Set(input.description),
            location: Set(input.location),
            capacity: Set(input.capacity),
            return_rate: Set(input.return_rate),
            total_target: Set(input.total_target),
            funded_amount: Set(0),
            investors_count: Set(0),
            image_url: Set(input.image_url),
            details: Set(input.details),
            status: Set(input.status),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
        };

        model.insert(&self.conn).await.context("Failed to insert project")
    }

    pub async fn update(&self, project: projects::Model, input: ProjectInput) -> Result<projects::Model> {
        let mut active: projects::ActiveModel = project.into();
        active.name = Set(input.name);
        active.project_type = Set(input.project_type.to_uppercase());
        active.description = Set(input.description);
        active.location = Set(input.location);
        active.capacity = Set(input.capacity);
        active.return_rate = Set(input.return_rate);
        active.total_target = Set(input.total_target);
        active.image_url = Set(input.image_url);
        active.details = Set(input.details);
        active.status = Set(input.status);

        active.update(&self.conn).await.context("Failed to update project")
    }
}
