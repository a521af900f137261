//! SQLite backend over sqlx.
//!
//! `slug` is the primary key, which gives the storage-layer uniqueness
//! guard the pipeline relies on. Category listing filters on the
//! normalized slug columns written at ingest time, with indexes to match.

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqliteRow};
use sqlx::Row;

use vn_core::{ArticleRecord, Error, Page, PostStore, Result};

const MIGRATIONS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS posts (
        slug TEXT PRIMARY KEY,
        title TEXT NOT NULL,
        rewrite_title TEXT NOT NULL DEFAULT '',
        content TEXT NOT NULL,
        rewritten TEXT NOT NULL DEFAULT '',
        html_content TEXT NOT NULL DEFAULT '',
        thumbnail TEXT,
        images TEXT NOT NULL DEFAULT '[]',
        description TEXT NOT NULL DEFAULT '',
        author TEXT NOT NULL DEFAULT '',
        published_at TEXT NOT NULL,
        source TEXT NOT NULL DEFAULT '',
        main_category TEXT NOT NULL DEFAULT '',
        sub_category TEXT NOT NULL DEFAULT '',
        main_category_slug TEXT NOT NULL DEFAULT '',
        sub_category_slug TEXT NOT NULL DEFAULT '',
        tags TEXT NOT NULL DEFAULT '[]',
        read_time INTEGER NOT NULL DEFAULT 0,
        original_url TEXT NOT NULL DEFAULT '',
        published INTEGER NOT NULL DEFAULT 0,
        created_at TEXT NOT NULL,
        facebook_posted INTEGER NOT NULL DEFAULT 0,
        facebook_post_id TEXT NOT NULL DEFAULT '',
        facebook_post_time TEXT
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_posts_main_category_slug ON posts (main_category_slug, created_at)",
    "CREATE INDEX IF NOT EXISTS idx_posts_sub_category_slug ON posts (sub_category_slug)",
    "CREATE INDEX IF NOT EXISTS idx_posts_title ON posts (title)",
    "CREATE INDEX IF NOT EXISTS idx_posts_created_at ON posts (created_at)",
];

pub struct SqliteStore {
    pool: Arc<SqlitePool>,
    db_path: PathBuf,
}

fn storage_err(e: sqlx::Error) -> Error {
    Error::Storage(e.to_string())
}

impl SqliteStore {
    pub async fn new(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let options = SqliteConnectOptions::from_str(&format!("sqlite://{}", db_path.display()))
            .map_err(storage_err)?
            .create_if_missing(true);
        let pool = SqlitePool::connect_with(options).await.map_err(storage_err)?;

        for (i, migration) in MIGRATIONS.iter().enumerate() {
            sqlx::query(migration)
                .execute(&pool)
                .await
                .map_err(|e| Error::Storage(format!("migration {} failed: {}", i, e)))?;
        }

        Ok(Self {
            pool: Arc::new(pool),
            db_path: db_path.to_path_buf(),
        })
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    async fn fetch_page(
        &self,
        where_sql: &str,
        binds: &[String],
        page: usize,
        limit: usize,
    ) -> Result<Page<ArticleRecord>> {
        let page = page.max(1);
        let limit = limit.max(1);

        let count_sql = format!("SELECT COUNT(*) FROM posts {}", where_sql);
        let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
        for bind in binds {
            count_query = count_query.bind(bind);
        }
        let total = count_query
            .fetch_one(&*self.pool)
            .await
            .map_err(storage_err)? as usize;

        let select_sql = format!(
            "SELECT * FROM posts {} ORDER BY created_at DESC LIMIT ? OFFSET ?",
            where_sql
        );
        let mut select_query = sqlx::query(&select_sql);
        for bind in binds {
            select_query = select_query.bind(bind);
        }
        let rows = select_query
            .bind(limit as i64)
            .bind(((page - 1) * limit) as i64)
            .fetch_all(&*self.pool)
            .await
            .map_err(storage_err)?;

        let mut data = Vec::with_capacity(rows.len());
        for row in &rows {
            data.push(row_to_record(row).map_err(storage_err)?);
        }
        Ok(Page::new(data, total, page, limit))
    }
}

fn row_to_record(row: &SqliteRow) -> sqlx::Result<ArticleRecord> {
    let images: String = row.try_get("images")?;
    let tags: String = row.try_get("tags")?;
    Ok(ArticleRecord {
        title: row.try_get("title")?,
        rewrite_title: row.try_get("rewrite_title")?,
        slug: row.try_get("slug")?,
        content: row.try_get("content")?,
        rewritten: row.try_get("rewritten")?,
        html_content: row.try_get("html_content")?,
        thumbnail: row.try_get("thumbnail")?,
        images: serde_json::from_str(&images).unwrap_or_default(),
        description: row.try_get("description")?,
        author: row.try_get("author")?,
        published_at: row.try_get::<DateTime<Utc>, _>("published_at")?,
        source: row.try_get("source")?,
        main_category: row.try_get("main_category")?,
        sub_category: row.try_get("sub_category")?,
        main_category_slug: row.try_get("main_category_slug")?,
        sub_category_slug: row.try_get("sub_category_slug")?,
        tags: serde_json::from_str(&tags).unwrap_or_default(),
        read_time: row.try_get::<i64, _>("read_time")? as u32,
        original_url: row.try_get("original_url")?,
        published: row.try_get("published")?,
        created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
        facebook_posted: row.try_get("facebook_posted")?,
        facebook_post_id: row.try_get("facebook_post_id")?,
        facebook_post_time: row.try_get::<Option<DateTime<Utc>>, _>("facebook_post_time")?,
    })
}

#[async_trait]
impl PostStore for SqliteStore {
    async fn insert(&self, record: &ArticleRecord) -> Result<()> {
        let images = serde_json::to_string(&record.images)?;
        let tags = serde_json::to_string(&record.tags)?;

        let result = sqlx::query(
            r#"
            INSERT INTO posts
            (slug, title, rewrite_title, content, rewritten, html_content, thumbnail,
             images, description, author, published_at, source, main_category,
             sub_category, main_category_slug, sub_category_slug, tags, read_time,
             original_url, published, created_at, facebook_posted, facebook_post_id,
             facebook_post_time)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&record.slug)
        .bind(&record.title)
        .bind(&record.rewrite_title)
        .bind(&record.content)
        .bind(&record.rewritten)
        .bind(&record.html_content)
        .bind(&record.thumbnail)
        .bind(&images)
        .bind(&record.description)
        .bind(&record.author)
        .bind(record.published_at)
        .bind(&record.source)
        .bind(&record.main_category)
        .bind(&record.sub_category)
        .bind(&record.main_category_slug)
        .bind(&record.sub_category_slug)
        .bind(&tags)
        .bind(record.read_time as i64)
        .bind(&record.original_url)
        .bind(record.published)
        .bind(record.created_at)
        .bind(record.facebook_posted)
        .bind(&record.facebook_post_id)
        .bind(record.facebook_post_time)
        .execute(&*self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(db)) if db.message().contains("UNIQUE constraint failed") => {
                Err(Error::DuplicateSlug(record.slug.clone()))
            }
            Err(e) => Err(storage_err(e)),
        }
    }

    async fn exists_by_title(&self, title: &str) -> Result<bool> {
        let found: Option<i64> = sqlx::query_scalar("SELECT 1 FROM posts WHERE title = ? LIMIT 1")
            .bind(title)
            .fetch_optional(&*self.pool)
            .await
            .map_err(storage_err)?;
        Ok(found.is_some())
    }

    async fn get_by_slug(&self, slug: &str) -> Result<Option<ArticleRecord>> {
        let row = sqlx::query("SELECT * FROM posts WHERE slug = ?")
            .bind(slug)
            .fetch_optional(&*self.pool)
            .await
            .map_err(storage_err)?;
        match row {
            Some(row) => Ok(Some(row_to_record(&row).map_err(storage_err)?)),
            None => Ok(None),
        }
    }

    async fn list(
        &self,
        page: usize,
        limit: usize,
        published_only: bool,
    ) -> Result<Page<ArticleRecord>> {
        let where_sql = if published_only {
            "WHERE published = 1"
        } else {
            ""
        };
        self.fetch_page(where_sql, &[], page, limit).await
    }

    async fn list_by_category(
        &self,
        main_slug: &str,
        sub_slug: Option<&str>,
        page: usize,
        limit: usize,
    ) -> Result<Page<ArticleRecord>> {
        match sub_slug {
            Some(sub) => {
                self.fetch_page(
                    "WHERE main_category_slug = ? AND sub_category_slug = ?",
                    &[main_slug.to_string(), sub.to_string()],
                    page,
                    limit,
                )
                .await
            }
            None => {
                self.fetch_page(
                    "WHERE main_category_slug = ?",
                    &[main_slug.to_string()],
                    page,
                    limit,
                )
                .await
            }
        }
    }

    async fn search(
        &self,
        query: &str,
        page: usize,
        limit: usize,
    ) -> Result<Page<ArticleRecord>> {
        if query.trim().is_empty() {
            return self.list(page, limit, false).await;
        }
        let pattern = format!("%{}%", query.to_lowercase());
        let where_sql = "WHERE lower(title) LIKE ? OR lower(content) LIKE ? \
                         OR lower(author) LIKE ? OR lower(main_category) LIKE ? \
                         OR lower(sub_category) LIKE ? OR lower(tags) LIKE ?";
        let binds = vec![pattern; 6];
        self.fetch_page(where_sql, &binds, page, limit).await
    }

    async fn mark_facebook_posted(&self, slug: &str, post_id: &str) -> Result<()> {
        let result = sqlx::query(
            "UPDATE posts SET facebook_posted = 1, facebook_post_id = ?, facebook_post_time = ? \
             WHERE slug = ?",
        )
        .bind(post_id)
        .bind(Utc::now())
        .bind(slug)
        .execute(&*self.pool)
        .await
        .map_err(storage_err)?;

        if result.rows_affected() == 0 {
            return Err(Error::Storage(format!("no article with slug {}", slug)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(slug: &str, title: &str) -> ArticleRecord {
        ArticleRecord {
            title: title.to_string(),
            rewrite_title: "Tiêu đề mới".to_string(),
            slug: slug.to_string(),
            content: "Nội dung thử nghiệm.".to_string(),
            rewritten: "Nội dung viết lại.".to_string(),
            html_content: "<p>Nội dung</p>".to_string(),
            thumbnail: Some("https://cdn.test/thumb.jpg".to_string()),
            images: vec!["https://cdn.test/1.jpg".to_string()],
            description: "Mô tả".to_string(),
            author: "Nguyễn Văn A".to_string(),
            published_at: Utc::now(),
            source: "VnExpress".to_string(),
            main_category: "Công nghệ".to_string(),
            sub_category: "AI".to_string(),
            main_category_slug: "cong-nghe".to_string(),
            sub_category_slug: "ai".to_string(),
            tags: vec!["AI".to_string(), "báo chí".to_string()],
            read_time: 4,
            original_url: format!("https://vnexpress.net/{}.html", slug),
            published: true,
            created_at: Utc::now(),
            facebook_posted: false,
            facebook_post_id: String::new(),
            facebook_post_time: None,
        }
    }

    async fn store() -> (SqliteStore, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteStore::new(&dir.path().join("posts.db")).await.unwrap();
        (store, dir)
    }

    #[tokio::test]
    async fn test_round_trip() {
        let (store, _dir) = store().await;
        let original = record("bai-mot", "Bài một");
        store.insert(&original).await.unwrap();

        let found = store.get_by_slug("bai-mot").await.unwrap().unwrap();
        assert_eq!(found.title, original.title);
        assert_eq!(found.images, original.images);
        assert_eq!(found.tags, original.tags);
        assert_eq!(found.read_time, 4);
        assert_eq!(found.thumbnail, original.thumbnail);
        assert!(found.published);
    }

    #[tokio::test]
    async fn test_unique_slug_violation_maps_to_duplicate() {
        let (store, _dir) = store().await;
        store.insert(&record("bai-mot", "Bài một")).await.unwrap();
        let result = store.insert(&record("bai-mot", "Tiêu đề khác")).await;
        assert!(matches!(result, Err(Error::DuplicateSlug(_))));
    }

    #[tokio::test]
    async fn test_exists_by_title() {
        let (store, _dir) = store().await;
        store.insert(&record("bai-mot", "Bài một")).await.unwrap();
        assert!(store.exists_by_title("Bài một").await.unwrap());
        assert!(!store.exists_by_title("Bài hai").await.unwrap());
    }

    #[tokio::test]
    async fn test_category_listing() {
        let (store, _dir) = store().await;
        store.insert(&record("bai-ai", "Bài AI")).await.unwrap();
        let mut other = record("bai-quan-su", "Bài quân sự");
        other.main_category_slug = "the-gioi".to_string();
        other.sub_category_slug = "quan-su".to_string();
        store.insert(&other).await.unwrap();

        let page = store.list_by_category("cong-nghe", None, 1, 10).await.unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.data[0].slug, "bai-ai");

        let page = store
            .list_by_category("the-gioi", Some("quan-su"), 1, 10)
            .await
            .unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.data[0].slug, "bai-quan-su");
    }

    #[tokio::test]
    async fn test_search_and_pagination() {
        let (store, _dir) = store().await;
        for i in 0..3 {
            store
                .insert(&record(&format!("bai-{}", i), &format!("Tin AI số {}", i)))
                .await
                .unwrap();
        }

        let page = store.search("tin ai", 1, 2).await.unwrap();
        assert_eq!(page.total, 3);
        assert_eq!(page.data.len(), 2);
        assert!(page.has_next_page);

        let none = store.search("zzz", 1, 10).await.unwrap();
        assert_eq!(none.total, 0);
    }

    #[tokio::test]
    async fn test_mark_facebook_posted() {
        let (store, _dir) = store().await;
        store.insert(&record("bai-mot", "Bài một")).await.unwrap();
        store.mark_facebook_posted("bai-mot", "fb-99").await.unwrap();

        let found = store.get_by_slug("bai-mot").await.unwrap().unwrap();
        assert!(found.facebook_posted);
        assert_eq!(found.facebook_post_id, "fb-99");
        assert!(found.facebook_post_time.is_some());
    }
}
