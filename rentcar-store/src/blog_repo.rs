use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rentcar_core::blog::{BlogPost, BlogPostInput};
use rentcar_core::repository::{BlogRepository, RepoError};
use sqlx::PgPool;
use uuid::Uuid;

pub struct PgBlogRepository {
    pool: PgPool,
}

impl PgBlogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct BlogPostRow {
    id: i64,
    author_id: Uuid,
    title: String,
    content: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<BlogPostRow> for BlogPost {
    fn from(row: BlogPostRow) -> Self {
        BlogPost {
            id: row.id,
            author_id: row.author_id,
            title: row.title,
            content: row.content,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl BlogRepository for PgBlogRepository {
    async fn list_posts(&self) -> Result<Vec<BlogPost>, RepoError> {
        let rows: Vec<BlogPostRow> = sqlx::query_as(
            "SELECT id, author_id, title, content, created_at, updated_at FROM blog_posts ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(BlogPost::from).collect())
    }

    async fn get_post(&self, id: i64) -> Result<Option<BlogPost>, RepoError> {
        let row: Option<BlogPostRow> = sqlx::query_as(
            "SELECT id, author_id, title, content, created_at, updated_at FROM blog_posts WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(BlogPost::from))
    }

    async fn create_post(&self, author_id: Uuid, post: &BlogPostInput) -> Result<BlogPost, RepoError> {
        let row: BlogPostRow = sqlx::query_as(
            r#"
            INSERT INTO blog_posts (author_id, title, content)
            VALUES ($1, $2, $3)
            RETURNING id, author_id, title, content, created_at, updated_at
            "#,
        )
        .bind(author_id)
        .bind(post.title.trim())
        .bind(&post.content)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn update_post(&self, id: i64, post: &BlogPostInput) -> Result<Option<BlogPost>, RepoError> {
        let row: Option<BlogPostRow> = sqlx::query_as(
            r#"
            UPDATE blog_posts
            SET title = $1, content = $2, updated_at = NOW()
            WHERE id = $3
            RETURNING id, author_id, title, content, created_at, updated_at
            "#,
        )
        .bind(post.title.trim())
        .bind(&post.content)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(BlogPost::from))
    }

    async fn delete_post(&self, id: i64) -> Result<bool, RepoError> {
        let result = sqlx::query("DELETE FROM blog_posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
