//! In-memory backend. Linear scans over an `RwLock`'d vector; good for
//! tests, development and small single-process deployments.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use vn_core::{ArticleRecord, Error, Page, PostStore, Result};

#[derive(Default)]
pub struct MemoryStore {
    posts: Arc<RwLock<Vec<ArticleRecord>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn paginate(mut records: Vec<ArticleRecord>, page: usize, limit: usize) -> Page<ArticleRecord> {
    records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    let page = page.max(1);
    let limit = limit.max(1);
    let total = records.len();
    let start = (page - 1) * limit;
    let data = records.into_iter().skip(start).take(limit).collect();
    Page::new(data, total, page, limit)
}

#[async_trait]
impl PostStore for MemoryStore {
    async fn insert(&self, record: &ArticleRecord) -> Result<()> {
        let mut posts = self.posts.write().await;
        if posts.iter().any(|p| p.slug == record.slug) {
            return Err(Error::DuplicateSlug(record.slug.clone()));
        }
        posts.push(record.clone());
        Ok(())
    }

    async fn exists_by_title(&self, title: &str) -> Result<bool> {
        let posts = self.posts.read().await;
        Ok(posts.iter().any(|p| p.title == title))
    }

    async fn get_by_slug(&self, slug: &str) -> Result<Option<ArticleRecord>> {
        let posts = self.posts.read().await;
        Ok(posts.iter().find(|p| p.slug == slug).cloned())
    }

    async fn list(
        &self,
        page: usize,
        limit: usize,
        published_only: bool,
    ) -> Result<Page<ArticleRecord>> {
        let posts = self.posts.read().await;
        let matched: Vec<ArticleRecord> = posts
            .iter()
            .filter(|p| !published_only || p.published)
            .cloned()
            .collect();
        Ok(paginate(matched, page, limit))
    }

    async fn list_by_category(
        &self,
        main_slug: &str,
        sub_slug: Option<&str>,
        page: usize,
        limit: usize,
    ) -> Result<Page<ArticleRecord>> {
        let posts = self.posts.read().await;
        let matched: Vec<ArticleRecord> = posts
            .iter()
            .filter(|p| p.main_category_slug == main_slug)
            .filter(|p| sub_slug.map_or(true, |s| p.sub_category_slug == s))
            .cloned()
            .collect();
        Ok(paginate(matched, page, limit))
    }

    async fn search(
        &self,
        query: &str,
        page: usize,
        limit: usize,
    ) -> Result<Page<ArticleRecord>> {
        let needle = query.to_lowercase();
        let posts = self.posts.read().await;
        let matched: Vec<ArticleRecord> = posts
            .iter()
            .filter(|p| {
                needle.is_empty()
                    || p.title.to_lowercase().contains(&needle)
                    || p.content.to_lowercase().contains(&needle)
                    || p.author.to_lowercase().contains(&needle)
                    || p.main_category.to_lowercase().contains(&needle)
                    || p.sub_category.to_lowercase().contains(&needle)
                    || p.tags.iter().any(|t| t.to_lowercase().contains(&needle))
            })
            .cloned()
            .collect();
        Ok(paginate(matched, page, limit))
    }

    async fn mark_facebook_posted(&self, slug: &str, post_id: &str) -> Result<()> {
        let mut posts = self.posts.write().await;
        let record = posts
            .iter_mut()
            .find(|p| p.slug == slug)
            .ok_or_else(|| Error::Storage(format!("no article with slug {}", slug)))?;
        record.facebook_posted = true;
        record.facebook_post_id = post_id.to_string();
        record.facebook_post_time = Some(chrono::Utc::now());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn record(slug: &str, title: &str) -> ArticleRecord {
        ArticleRecord {
            title: title.to_string(),
            rewrite_title: String::new(),
            slug: slug.to_string(),
            content: "Nội dung thử nghiệm.".to_string(),
            rewritten: String::new(),
            html_content: String::new(),
            thumbnail: None,
            images: Vec::new(),
            description: String::new(),
            author: "Nguyễn Văn A".to_string(),
            published_at: Utc::now(),
            source: "VnExpress".to_string(),
            main_category: "Công nghệ".to_string(),
            sub_category: "AI".to_string(),
            main_category_slug: "cong-nghe".to_string(),
            sub_category_slug: "ai".to_string(),
            tags: vec!["AI".to_string()],
            read_time: 3,
            original_url: format!("https://vnexpress.net/{}.html", slug),
            published: true,
            created_at: Utc::now(),
            facebook_posted: false,
            facebook_post_id: String::new(),
            facebook_post_time: None,
        }
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let store = MemoryStore::new();
        store.insert(&record("bai-mot", "Bài một")).await.unwrap();
        let found = store.get_by_slug("bai-mot").await.unwrap().unwrap();
        assert_eq!(found.title, "Bài một");
        assert!(store.get_by_slug("khong-co").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_slug_rejected() {
        let store = MemoryStore::new();
        store.insert(&record("bai-mot", "Bài một")).await.unwrap();
        let result = store.insert(&record("bai-mot", "Tiêu đề khác")).await;
        assert!(matches!(result, Err(Error::DuplicateSlug(_))));

        // the first record is untouched
        let found = store.get_by_slug("bai-mot").await.unwrap().unwrap();
        assert_eq!(found.title, "Bài một");
    }

    #[tokio::test]
    async fn test_exists_by_title_is_exact() {
        let store = MemoryStore::new();
        store.insert(&record("bai-mot", "Bài một")).await.unwrap();
        assert!(store.exists_by_title("Bài một").await.unwrap());
        assert!(!store.exists_by_title("bài một").await.unwrap());
        assert!(!store.exists_by_title("Bài một!").await.unwrap());
    }

    #[tokio::test]
    async fn test_list_orders_newest_first_and_paginates() {
        let store = MemoryStore::new();
        for i in 0..5 {
            let mut r = record(&format!("bai-{}", i), &format!("Bài {}", i));
            r.created_at = Utc::now() - Duration::minutes(10 - i);
            store.insert(&r).await.unwrap();
        }

        let page = store.list(1, 2, true).await.unwrap();
        assert_eq!(page.total, 5);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.data[0].slug, "bai-4");
        assert!(page.has_next_page);
        assert!(!page.has_prev_page);

        let last = store.list(3, 2, true).await.unwrap();
        assert_eq!(last.data.len(), 1);
        assert!(!last.has_next_page);
    }

    #[tokio::test]
    async fn test_list_published_filter() {
        let store = MemoryStore::new();
        let mut draft = record("nhap", "Bản nháp");
        draft.published = false;
        store.insert(&draft).await.unwrap();
        store.insert(&record("cong-khai", "Công khai")).await.unwrap();

        assert_eq!(store.list(1, 10, true).await.unwrap().total, 1);
        assert_eq!(store.list(1, 10, false).await.unwrap().total, 2);
    }

    #[tokio::test]
    async fn test_list_by_category_slug() {
        let store = MemoryStore::new();
        store.insert(&record("bai-ai", "Bài AI")).await.unwrap();
        let mut other = record("bai-xe", "Bài xe");
        other.main_category = "Thế giới".to_string();
        other.main_category_slug = "the-gioi".to_string();
        other.sub_category_slug = "quan-su".to_string();
        store.insert(&other).await.unwrap();

        let page = store.list_by_category("cong-nghe", None, 1, 10).await.unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.data[0].slug, "bai-ai");

        let page = store
            .list_by_category("cong-nghe", Some("ai"), 1, 10)
            .await
            .unwrap();
        assert_eq!(page.total, 1);

        let page = store
            .list_by_category("cong-nghe", Some("thiet-bi"), 1, 10)
            .await
            .unwrap();
        assert_eq!(page.total, 0);
    }

    #[tokio::test]
    async fn test_search_spans_fields() {
        let store = MemoryStore::new();
        store.insert(&record("bai-mot", "Trí tuệ nhân tạo")).await.unwrap();

        assert_eq!(store.search("trí tuệ", 1, 10).await.unwrap().total, 1);
        assert_eq!(store.search("nguyễn văn", 1, 10).await.unwrap().total, 1);
        assert_eq!(store.search("ai", 1, 10).await.unwrap().total, 1);
        assert_eq!(store.search("không khớp gì", 1, 10).await.unwrap().total, 0);
    }

    #[tokio::test]
    async fn test_mark_facebook_posted() {
        let store = MemoryStore::new();
        store.insert(&record("bai-mot", "Bài một")).await.unwrap();
        store.mark_facebook_posted("bai-mot", "fb-123").await.unwrap();

        let found = store.get_by_slug("bai-mot").await.unwrap().unwrap();
        assert!(found.facebook_posted);
        assert_eq!(found.facebook_post_id, "fb-123");
        assert!(found.facebook_post_time.is_some());

        let missing = store.mark_facebook_posted("khong-co", "fb-1").await;
        assert!(matches!(missing, Err(Error::Storage(_))));
    }
}
