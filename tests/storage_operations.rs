mod common;

use chrono::{Duration, Utc};
use common::{comment_input, post_input, store_input, test_db};
use spotlight_backend::models::db_operations::comments_db_operations::{self, CommentTotals};
use spotlight_backend::models::db_operations::posts_db_operations::{self, PostCounter, PostFilter};
use spotlight_backend::models::db_operations::{stores_db_operations, DbError};
use spotlight_backend::models::pagination::{PageRequest, Pagination};
use spotlight_backend::models::{Category, CategoryCounts, Comment, CommentStatus, Post, Store};

fn seed_stores(db: &redb::Database, count: usize) -> Vec<Store> {
    let start = Utc::now();
    (0..count)
        .map(|i| {
            let input = store_input(&format!("Store {}", i), "서울 중구 세종대로 1", &format!("KR-{:04}", i));
            let store = Store::from_input(input, start + Duration::seconds(i as i64));
            stores_db_operations::insert_store(db, &store).unwrap();
            store
        })
        .collect()
}

fn seed_post(db: &redb::Database, title: &str, category: Category, published: bool, offset_secs: i64) -> Post {
    let slug = title.to_lowercase().replace(' ', "-");
    let post = Post::from_input(
        post_input(title, category, published, None),
        slug,
        Utc::now() + Duration::seconds(offset_secs),
    );
    posts_db_operations::insert_post(db, &post).unwrap();
    post
}

#[test]
fn twenty_three_stores_split_into_three_pages_newest_first() {
    let (_dir, db) = test_db();
    let stores = seed_stores(&db, 23);

    let request = PageRequest::new(Some(1), Some(10)).unwrap();
    let page = stores_db_operations::read_stores_page(&db, None, request.offset(), 10).unwrap();
    let pagination = Pagination::new(request, page.total_count);
    assert_eq!(page.items.len(), 10);
    assert_eq!(page.items[0].id, stores[22].id);
    assert_eq!(pagination.total_pages, 3);
    assert!(pagination.has_next_page);
    assert!(!pagination.has_prev_page);

    let request = PageRequest::new(Some(3), Some(10)).unwrap();
    let page = stores_db_operations::read_stores_page(&db, None, request.offset(), 10).unwrap();
    let pagination = Pagination::new(request, page.total_count);
    assert_eq!(page.items.len(), 3);
    assert_eq!(page.items[2].id, stores[0].id);
    assert!(!pagination.has_next_page);
    assert!(pagination.has_prev_page);
}

#[test]
fn page_past_the_end_is_empty_with_correct_metadata() {
    let (_dir, db) = test_db();
    seed_stores(&db, 23);

    let request = PageRequest::new(Some(4), Some(10)).unwrap();
    let page = stores_db_operations::read_stores_page(&db, None, request.offset(), 10).unwrap();
    let pagination = Pagination::new(request, page.total_count);
    assert!(page.items.is_empty());
    assert_eq!(pagination.total_count, 23);
    assert_eq!(pagination.total_pages, 3);
    assert!(!pagination.has_next_page);
}

#[test]
fn duplicate_store_id_is_rejected_without_writing() {
    let (_dir, db) = test_db();
    let first = Store::from_input(store_input("Gangnam R", "서울 강남구", "KR-0001"), Utc::now());
    stores_db_operations::insert_store(&db, &first).unwrap();

    let second = Store::from_input(store_input("Another", "서울 종로구", "KR-0001"), Utc::now());
    let err = stores_db_operations::insert_store(&db, &second).unwrap_err();
    assert!(matches!(err, DbError::Duplicate(_)));

    assert_eq!(stores_db_operations::count_stores(&db).unwrap(), 1);
    assert!(stores_db_operations::read_store(&db, second.id).unwrap().is_none());
    assert_eq!(stores_db_operations::read_store(&db, first.id).unwrap(), Some(first));
}

#[test]
fn changing_store_id_frees_the_old_key() {
    let (_dir, db) = test_db();
    let mut store = Store::from_input(store_input("Gangnam R", "서울 강남구", "KR-0001"), Utc::now());
    stores_db_operations::insert_store(&db, &store).unwrap();
    let other = Store::from_input(store_input("Jongno", "서울 종로구", "KR-0002"), Utc::now());
    stores_db_operations::insert_store(&db, &other).unwrap();

    store.store_id = "KR-0002".to_string();
    let err = stores_db_operations::update_store(&db, &store).unwrap_err();
    assert!(matches!(err, DbError::Duplicate(_)));

    store.store_id = "KR-0100".to_string();
    stores_db_operations::update_store(&db, &store).unwrap();

    let reuse = Store::from_input(store_input("New", "부산 해운대구", "KR-0001"), Utc::now());
    stores_db_operations::insert_store(&db, &reuse).unwrap();
    assert_eq!(stores_db_operations::count_stores(&db).unwrap(), 3);
}

#[test]
fn updating_a_missing_store_is_not_found() {
    let (_dir, db) = test_db();
    let ghost = Store::from_input(store_input("Ghost", "nowhere", "KR-9999"), Utc::now());
    let err = stores_db_operations::update_store(&db, &ghost).unwrap_err();
    assert!(matches!(err, DbError::NotFound(_)));
}

#[test]
fn hangul_search_counts_only_matching_stores() {
    let (_dir, db) = test_db();
    let now = Utc::now();
    let addresses = [
        "서울 강남구 강남대로 390",
        "서울 종로구 종로 51",
        "서울 강남구 테헤란로 101",
        "부산 해운대구 해운대로 620",
        "서울 강남구 압구정로 120",
    ];
    for (i, address) in addresses.iter().enumerate() {
        let input = store_input(&format!("Store {}", i), address, &format!("KR-{:04}", i));
        let store = Store::from_input(input, now + Duration::seconds(i as i64));
        stores_db_operations::insert_store(&db, &store).unwrap();
    }

    let page = stores_db_operations::read_stores_page(&db, Some("강남"), 0, 10).unwrap();
    assert_eq!(page.total_count, 3);
    assert!(page.items.iter().all(|store| store.address.contains("강남")));
    assert_eq!(page.items[0].store_id, "KR-0004");
}

#[test]
fn store_tags_are_listed_once_ignoring_case() {
    let (_dir, db) = test_db();
    let mut first = store_input("Gangnam R", "서울 강남구", "KR-0001");
    first.tags = vec!["Seoul".to_string(), "Reserve".to_string()];
    let mut second = store_input("Jongno", "서울 종로구", "KR-0002");
    second.tags = vec!["seoul".to_string(), "DT".to_string()];
    for input in [first, second] {
        stores_db_operations::insert_store(&db, &Store::from_input(input, Utc::now())).unwrap();
    }

    let tags = stores_db_operations::read_all_store_tags(&db).unwrap();
    assert_eq!(tags.len(), 3);
    assert!(tags.iter().filter(|tag| tag.eq_ignore_ascii_case("seoul")).count() == 1);
}

#[test]
fn deleting_a_store_removes_its_key() {
    let (_dir, db) = test_db();
    let store = Store::from_input(store_input("Gangnam R", "서울 강남구", "KR-0001"), Utc::now());
    stores_db_operations::insert_store(&db, &store).unwrap();

    let removed = stores_db_operations::delete_store(&db, store.id).unwrap();
    assert_eq!(removed.id, store.id);
    assert_eq!(stores_db_operations::count_stores(&db).unwrap(), 0);
    let page = stores_db_operations::read_stores_page(&db, None, 0, 10).unwrap();
    assert!(page.items.is_empty());

    let again = Store::from_input(store_input("Gangnam R", "서울 강남구", "KR-0001"), Utc::now());
    stores_db_operations::insert_store(&db, &again).unwrap();
}

#[test]
fn post_filters_combine_published_category_and_search() {
    let (_dir, db) = test_db();
    seed_post(&db, "Gangnam Reserve", Category::Domestic, true, 0);
    seed_post(&db, "Tokyo Roastery", Category::Overseas, true, 1);
    seed_post(&db, "Draft Opening", Category::Domestic, false, 2);
    seed_post(&db, "Holiday Cups", Category::Special, true, 3);

    let all = posts_db_operations::read_posts_page(&db, &PostFilter::default(), 0, 10).unwrap();
    assert_eq!(all.total_count, 4);
    assert_eq!(all.items[0].title, "Holiday Cups");

    let published = PostFilter { published_only: true, ..Default::default() };
    let page = posts_db_operations::read_posts_page(&db, &published, 0, 10).unwrap();
    assert_eq!(page.total_count, 3);

    let domestic = PostFilter { published_only: true, category: Some(Category::Domestic), search: None };
    let page = posts_db_operations::read_posts_page(&db, &domestic, 0, 10).unwrap();
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].title, "Gangnam Reserve");

    let search = PostFilter { published_only: true, category: None, search: Some("roastery".to_string()) };
    let page = posts_db_operations::read_posts_page(&db, &search, 0, 10).unwrap();
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].title, "Tokyo Roastery");
}

#[test]
fn category_counts_include_only_published_posts() {
    let (_dir, db) = test_db();
    seed_post(&db, "Gangnam Reserve", Category::Domestic, true, 0);
    seed_post(&db, "Jeju Island", Category::Domestic, true, 1);
    seed_post(&db, "Draft Opening", Category::Domestic, false, 2);
    seed_post(&db, "Tokyo Roastery", Category::Overseas, true, 3);

    let counts = posts_db_operations::count_published_by_category(&db).unwrap();
    assert_eq!(counts, CategoryCounts { domestic: 2, overseas: 1, special: 0 });
}

#[test]
fn slugs_are_unique_and_freed_on_delete() {
    let (_dir, db) = test_db();
    let post = seed_post(&db, "Gangnam Reserve", Category::Domestic, true, 0);

    let clash = Post::from_input(
        post_input("Another", Category::Special, true, None),
        post.slug.clone(),
        Utc::now(),
    );
    assert!(matches!(posts_db_operations::insert_post(&db, &clash), Err(DbError::Duplicate(_))));

    posts_db_operations::delete_post(&db, post.id).unwrap();
    assert!(posts_db_operations::read_post_by_slug(&db, &post.slug).unwrap().is_none());
    posts_db_operations::insert_post(&db, &clash).unwrap();
    assert_eq!(
        posts_db_operations::read_post_by_slug(&db, &post.slug).unwrap().map(|p| p.id),
        Some(clash.id)
    );
}

#[test]
fn renaming_a_slug_moves_the_index() {
    let (_dir, db) = test_db();
    let mut post = seed_post(&db, "Gangnam Reserve", Category::Domestic, true, 0);
    post.slug = "gangnam-reserve-2026".to_string();

    let previous = posts_db_operations::update_post(&db, &post).unwrap();
    assert_eq!(previous.slug, "gangnam-reserve");
    assert!(posts_db_operations::read_post_by_slug(&db, "gangnam-reserve").unwrap().is_none());
    assert!(posts_db_operations::read_post_by_slug(&db, "gangnam-reserve-2026").unwrap().is_some());
}

#[test]
fn counters_increment_independently() {
    let (_dir, db) = test_db();
    let post = seed_post(&db, "Gangnam Reserve", Category::Domestic, true, 0);

    posts_db_operations::increment_post_counter(&db, post.id, PostCounter::Views).unwrap();
    posts_db_operations::increment_post_counter(&db, post.id, PostCounter::Views).unwrap();
    let after = posts_db_operations::increment_post_counter(&db, post.id, PostCounter::Likes).unwrap();
    assert_eq!((after.views, after.likes), (2, 1));
}

#[test]
fn soft_deleted_comments_stay_in_storage() {
    let (_dir, db) = test_db();
    let post = seed_post(&db, "Gangnam Reserve", Category::Domestic, true, 0);
    let now = Utc::now();
    let comments: Vec<Comment> = (0..3)
        .map(|i| {
            let comment = Comment::from_input(
                post.id,
                comment_input("minji", &format!("comment {}", i)),
                now + Duration::seconds(i),
            );
            comments_db_operations::insert_comment(&db, &comment).unwrap();
            comment
        })
        .collect();

    comments_db_operations::set_comment_status(&db, comments[1].id, CommentStatus::Deleted, Utc::now()).unwrap();

    let public = comments_db_operations::read_active_comments_page(&db, post.id, 0, 10).unwrap();
    assert_eq!(public.total_count, 2);
    assert_eq!(public.items[0].id, comments[2].id);
    assert!(public.items.iter().all(|c| c.id != comments[1].id));

    let admin = comments_db_operations::read_comments_page(&db, None, 0, 10).unwrap();
    assert_eq!(admin.total_count, 3);
    assert_eq!(comments_db_operations::count_active_comments(&db, post.id).unwrap(), 2);
    assert_eq!(
        comments_db_operations::count_comments(&db).unwrap(),
        CommentTotals { active: 2, deleted: 1 }
    );
}

#[test]
fn delete_then_restore_only_touches_flag_and_timestamp() {
    let (_dir, db) = test_db();
    let post = seed_post(&db, "Gangnam Reserve", Category::Domestic, true, 0);
    let original = Comment::from_input(post.id, comment_input("minji", "좋은 매장이네요"), Utc::now());
    comments_db_operations::insert_comment(&db, &original).unwrap();

    let deleted =
        comments_db_operations::set_comment_status(&db, original.id, CommentStatus::Deleted, Utc::now()).unwrap();
    assert_eq!(deleted.status, CommentStatus::Deleted);

    let restored =
        comments_db_operations::set_comment_status(&db, original.id, CommentStatus::Active, Utc::now()).unwrap();
    assert!(restored.updated_at >= original.updated_at);
    assert_eq!(Comment { updated_at: original.updated_at, ..restored }, original);
}

#[test]
fn comment_search_matches_author_content_and_email() {
    let (_dir, db) = test_db();
    let post = seed_post(&db, "Gangnam Reserve", Category::Domestic, true, 0);
    let mut with_email = comment_input("jisoo", "Great latte");
    with_email.email = Some("jisoo@example.com".to_string());
    for input in [comment_input("Minji", "좋은 매장"), with_email] {
        let comment = Comment::from_input(post.id, input, Utc::now());
        comments_db_operations::insert_comment(&db, &comment).unwrap();
    }

    let by_author = comments_db_operations::read_comments_page(&db, Some("minji"), 0, 10).unwrap();
    assert_eq!(by_author.total_count, 1);
    let by_email = comments_db_operations::read_comments_page(&db, Some("example.com"), 0, 10).unwrap();
    assert_eq!(by_email.items[0].author, "jisoo");
}
