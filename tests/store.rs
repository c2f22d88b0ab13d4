use chrono::Utc;
use minbar::store::{ContentStore, UpdateOutcome};

#[tokio::test]
async fn create_post_then_list_returns_it() {
    let store = ContentStore::in_memory().await.unwrap();
    let page_id = store.create_page("Lectures").await.unwrap();

    let before = Utc::now();
    let post_id = store.create_post("Intro", "Welcome", page_id).await.unwrap();

    let posts = store.list_posts(page_id).await.unwrap();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].id, post_id);
    assert_eq!(posts[0].title, "Intro");
    assert_eq!(posts[0].content, "Welcome");
    assert_eq!(posts[0].page_id, page_id);
    assert!(posts[0].date >= before);
}

#[tokio::test]
async fn update_post_replaces_fields_but_not_identity() {
    let store = ContentStore::in_memory().await.unwrap();
    let page_id = store.create_page("Lectures").await.unwrap();
    let post_id = store.create_post("Intro", "Welcome", page_id).await.unwrap();
    let original = store.list_posts(page_id).await.unwrap().remove(0);

    let outcome = store
        .update_post(post_id, "Intro (revised)", "Welcome back")
        .await
        .unwrap();
    assert_eq!(outcome, UpdateOutcome::Applied);

    let updated = store.list_posts(page_id).await.unwrap().remove(0);
    assert_eq!(updated.id, original.id);
    assert_eq!(updated.page_id, original.page_id);
    assert_eq!(updated.title, "Intro (revised)");
    assert_eq!(updated.content, "Welcome back");
    assert!(updated.date >= original.date);
}

#[tokio::test]
async fn delete_page_cascades_to_posts_and_links() {
    let store = ContentStore::in_memory().await.unwrap();
    let page_id = store.create_page("Lectures").await.unwrap();
    let other = store.create_page("Announcements").await.unwrap();

    store.create_post("Intro", "Welcome", page_id).await.unwrap();
    store.create_post("Second", "More", page_id).await.unwrap();
    store
        .create_link("http://example.com", Some("site"), page_id)
        .await
        .unwrap();
    store.create_post("Kept", "Untouched", other).await.unwrap();

    let outcome = store.delete_page(page_id).await.unwrap();
    assert_eq!(outcome, UpdateOutcome::Applied);

    assert!(store.list_posts(page_id).await.unwrap().is_empty());
    assert!(store.list_links(page_id).await.unwrap().is_empty());

    let pages = store.list_pages().await.unwrap();
    assert!(pages.iter().all(|p| p.id != page_id));

    // Unrelated page keeps its content
    assert_eq!(store.list_posts(other).await.unwrap().len(), 1);
}

#[tokio::test]
async fn updates_against_missing_ids_are_noops() {
    let store = ContentStore::in_memory().await.unwrap();

    assert_eq!(
        store.update_page(42, "ghost").await.unwrap(),
        UpdateOutcome::Missing
    );
    assert_eq!(
        store.update_post(42, "ghost", "ghost").await.unwrap(),
        UpdateOutcome::Missing
    );
    assert_eq!(
        store.update_link(42, "http://ghost", None).await.unwrap(),
        UpdateOutcome::Missing
    );

    // No rows were conjured into existence
    assert!(store.list_pages().await.unwrap().is_empty());
    assert!(store.list_posts(42).await.unwrap().is_empty());
    assert!(store.list_links(42).await.unwrap().is_empty());
}

#[tokio::test]
async fn deletes_against_missing_ids_are_noops() {
    let store = ContentStore::in_memory().await.unwrap();

    assert_eq!(store.delete_page(7).await.unwrap(), UpdateOutcome::Missing);
    assert_eq!(store.delete_post(7).await.unwrap(), UpdateOutcome::Missing);
    assert_eq!(store.delete_link(7).await.unwrap(), UpdateOutcome::Missing);
}

#[tokio::test]
async fn pages_list_in_insertion_order() {
    let store = ContentStore::in_memory().await.unwrap();
    let a = store.create_page("first").await.unwrap();
    let b = store.create_page("second").await.unwrap();
    let c = store.create_page("third").await.unwrap();

    let pages = store.list_pages().await.unwrap();
    let ids: Vec<i64> = pages.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![a, b, c]);
    assert_eq!(pages[0].name, "first");
    assert_eq!(pages[2].name, "third");
}

#[tokio::test]
async fn update_and_delete_link() {
    let store = ContentStore::in_memory().await.unwrap();
    let page_id = store.create_page("Lectures").await.unwrap();
    let link_id = store
        .create_link("http://old", Some("old description"), page_id)
        .await
        .unwrap();

    let outcome = store.update_link(link_id, "http://new", None).await.unwrap();
    assert_eq!(outcome, UpdateOutcome::Applied);

    let links = store.list_links(page_id).await.unwrap();
    assert_eq!(links[0].url, "http://new");
    assert_eq!(links[0].description, None);
    assert_eq!(links[0].page_id, page_id);

    assert_eq!(
        store.delete_link(link_id).await.unwrap(),
        UpdateOutcome::Applied
    );
    assert!(store.list_links(page_id).await.unwrap().is_empty());
}

#[tokio::test]
async fn orphan_link_insert_is_allowed() {
    // No referential check at insert time: a link may reference a page id
    // that does not exist.
    let store = ContentStore::in_memory().await.unwrap();

    let link_id = store
        .create_link("http://x", Some("desc"), 1)
        .await
        .unwrap();
    assert!(link_id > 0);

    let links = store.list_links(1).await.unwrap();
    assert_eq!(links.len(), 1);
    assert_eq!(links[0].url, "http://x");
}

#[tokio::test]
async fn lectures_scenario_end_to_end() {
    let store = ContentStore::in_memory().await.unwrap();

    let page_id = store.create_page("Lectures").await.unwrap();
    assert_eq!(page_id, 1);

    let post_id = store.create_post("Intro", "Welcome", page_id).await.unwrap();
    assert_eq!(post_id, 1);

    let posts = store.list_posts(page_id).await.unwrap();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].title, "Intro");
    assert_eq!(posts[0].content, "Welcome");

    store.delete_page(page_id).await.unwrap();
    assert!(store.list_posts(page_id).await.unwrap().is_empty());
    assert!(store.list_links(page_id).await.unwrap().is_empty());
    assert!(store.list_pages().await.unwrap().is_empty());
}

#[tokio::test]
async fn schema_init_is_idempotent_across_reopens() {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite:{}", dir.path().join("blog.db").display());

    let page_id = {
        let store = ContentStore::connect(&url).await.unwrap();
        store.create_page("Lectures").await.unwrap()
    };

    // Second open runs init() again against the existing schema
    let store = ContentStore::connect(&url).await.unwrap();
    let pages = store.list_pages().await.unwrap();
    assert_eq!(pages.len(), 1);
    assert_eq!(pages[0].id, page_id);
    assert_eq!(pages[0].name, "Lectures");
}
