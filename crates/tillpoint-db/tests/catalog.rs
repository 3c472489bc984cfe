//! Product catalog integration tests against an in-memory database.

use tillpoint_core::{CoreError, Product};
use tillpoint_db::{Database, DbConfig, DbError, NewProduct};

async fn db() -> Database {
    Database::new(DbConfig::in_memory())
        .await
        .expect("in-memory database")
}

async fn seed(db: &Database, name: &str, price_cents: i64, stock: i64, threshold: i64) -> Product {
    let id = db
        .products()
        .insert(
            &NewProduct::new(name, price_cents, stock).alert_threshold(threshold),
            false,
        )
        .await
        .unwrap();
    db.products().get_by_id(id).await.unwrap().unwrap()
}

#[tokio::test]
async fn insert_and_get_by_id() {
    let db = db().await;

    let id = db
        .products()
        .insert(&NewProduct::new("Ballpoint Pen", 200, 10), false)
        .await
        .unwrap();

    let pen = db.products().get_by_id(id).await.unwrap().unwrap();
    assert_eq!(pen.id, id);
    assert_eq!(pen.name, "Ballpoint Pen");
    assert_eq!(pen.price_cents, 200);
    assert_eq!(pen.stock, 10);
    // Threshold defaults to 10 when not set explicitly
    assert_eq!(pen.alert_threshold, 10);
}

#[tokio::test]
async fn get_by_id_absent_is_none() {
    let db = db().await;
    assert!(db.products().get_by_id(9999).await.unwrap().is_none());
    assert!(db.products().get_by_name("Ghost").await.unwrap().is_none());
    assert!(db.products().id_from_name("Ghost").await.unwrap().is_none());
}

#[tokio::test]
async fn insert_rejects_bad_input() {
    let db = db().await;
    let products = db.products();

    // Price below one cent
    let err = products
        .insert(&NewProduct::new("Freebie", 0, 10), false)
        .await
        .unwrap_err();
    assert!(err.is_domain(|c| matches!(c, CoreError::Validation(_))));

    // Negative stock
    let err = products
        .insert(&NewProduct::new("Phantom", 100, -1), false)
        .await
        .unwrap_err();
    assert!(err.is_domain(|c| matches!(c, CoreError::Validation(_))));

    // Empty name
    let err = products
        .insert(&NewProduct::new("   ", 100, 10), false)
        .await
        .unwrap_err();
    assert!(err.is_domain(|c| matches!(c, CoreError::Validation(_))));

    // Threshold of zero would never fire
    let err = products
        .insert(&NewProduct::new("Pen", 100, 10).alert_threshold(0), false)
        .await
        .unwrap_err();
    assert!(err.is_domain(|c| matches!(c, CoreError::Validation(_))));

    // Nothing got written along the way
    assert_eq!(products.count().await.unwrap(), 0);
}

#[tokio::test]
async fn duplicate_name_rejected_then_forced() {
    let db = db().await;
    let products = db.products();

    let first = products
        .insert(&NewProduct::new("Ballpoint Pen", 200, 10), false)
        .await
        .unwrap();

    let err = products
        .insert(&NewProduct::new("Ballpoint Pen", 250, 5), false)
        .await
        .unwrap_err();
    assert!(err.is_domain(|c| matches!(c, CoreError::DuplicateName(_))));
    assert_eq!(products.count().await.unwrap(), 1);

    // The operator may proceed anyway
    let second = products
        .insert(&NewProduct::new("Ballpoint Pen", 250, 5), true)
        .await
        .unwrap();
    assert_ne!(first, second);
    assert_eq!(products.count().await.unwrap(), 2);

    // Name resolution picks the oldest of the duplicates
    assert_eq!(products.id_from_name("Ballpoint Pen").await.unwrap(), Some(first));
}

#[tokio::test]
async fn update_changes_fields() {
    let db = db().await;
    let mut pen = seed(&db, "Ballpoint Pen", 200, 10, 10).await;

    pen.name = "Gel Pen".to_string();
    pen.price_cents = 250;
    pen.stock = 8;
    pen.alert_threshold = 4;
    db.products().update(&pen).await.unwrap();

    let reloaded = db.products().get_by_id(pen.id).await.unwrap().unwrap();
    assert_eq!(reloaded, pen);
}

#[tokio::test]
async fn update_unchanged_is_noop_success() {
    let db = db().await;
    let pen = seed(&db, "Ballpoint Pen", 200, 10, 10).await;

    // Writing the same values back succeeds
    db.products().update(&pen).await.unwrap();
    let reloaded = db.products().get_by_id(pen.id).await.unwrap().unwrap();
    assert_eq!(reloaded, pen);
}

#[tokio::test]
async fn update_absent_product_is_not_found() {
    let db = db().await;
    let ghost = Product {
        id: 424242,
        name: "Ghost".to_string(),
        price_cents: 100,
        stock: 1,
        alert_threshold: 1,
    };

    let err = db.products().update(&ghost).await.unwrap_err();
    assert!(matches!(err, DbError::NotFound { .. }));
}

#[tokio::test]
async fn update_rejects_name_owned_by_other_product() {
    let db = db().await;
    let pen = seed(&db, "Ballpoint Pen", 200, 10, 10).await;
    let mut pencil = seed(&db, "Pencil HB", 80, 30, 10).await;

    pencil.name = "Ballpoint Pen".to_string();
    let err = db.products().update(&pencil).await.unwrap_err();
    assert!(err.is_domain(|c| matches!(
        c,
        CoreError::NameConflict { owner_id, .. } if *owner_id == pen.id
    )));

    // Renaming to its own current name is fine
    let pen_again = db.products().get_by_id(pen.id).await.unwrap().unwrap();
    db.products().update(&pen_again).await.unwrap();
}

#[tokio::test]
async fn delete_by_id_and_name() {
    let db = db().await;
    let pen = seed(&db, "Ballpoint Pen", 200, 10, 10).await;
    let pencil = seed(&db, "Pencil HB", 80, 30, 10).await;

    db.products().delete(pen.id).await.unwrap();
    assert!(db.products().get_by_id(pen.id).await.unwrap().is_none());

    db.products().delete_by_name("Pencil HB").await.unwrap();
    assert!(db.products().get_by_id(pencil.id).await.unwrap().is_none());

    // Zero rows affected reports NotFound
    let err = db.products().delete(pen.id).await.unwrap_err();
    assert!(matches!(err, DbError::NotFound { .. }));
    let err = db.products().delete_by_name("Ghost").await.unwrap_err();
    assert!(matches!(err, DbError::NotFound { .. }));
}

#[tokio::test]
async fn alert_threshold_roundtrip() {
    let db = db().await;
    let pen = seed(&db, "Ballpoint Pen", 200, 10, 10).await;

    db.products().set_alert_threshold(pen.id, 3).await.unwrap();
    assert_eq!(db.products().alert_threshold(pen.id).await.unwrap(), Some(3));

    db.products()
        .set_alert_threshold_by_name("Ballpoint Pen", 7)
        .await
        .unwrap();
    assert_eq!(db.products().alert_threshold(pen.id).await.unwrap(), Some(7));

    // Threshold floor is 1
    let err = db.products().set_alert_threshold(pen.id, 0).await.unwrap_err();
    assert!(err.is_domain(|c| matches!(c, CoreError::Validation(_))));

    let err = db
        .products()
        .set_alert_threshold(9999, 5)
        .await
        .unwrap_err();
    assert!(matches!(err, DbError::NotFound { .. }));
}

#[tokio::test]
async fn set_stock_overwrites_absolute_value() {
    let db = db().await;
    let pen = seed(&db, "Ballpoint Pen", 200, 10, 10).await;

    // Overwrite, not delta: 10 → 3, then 3 → 50
    db.products().set_stock(pen.id, 3).await.unwrap();
    assert_eq!(
        db.products().get_by_id(pen.id).await.unwrap().unwrap().stock,
        3
    );

    db.products().set_stock_by_name("Ballpoint Pen", 50).await.unwrap();
    assert_eq!(
        db.products().get_by_id(pen.id).await.unwrap().unwrap().stock,
        50
    );

    // Negative stock is rejected before touching the row
    let err = db.products().set_stock(pen.id, -1).await.unwrap_err();
    assert!(err.is_domain(|c| matches!(c, CoreError::Validation(_))));
    assert_eq!(
        db.products().get_by_id(pen.id).await.unwrap().unwrap().stock,
        50
    );
}

#[tokio::test]
async fn list_all_in_id_order() {
    let db = db().await;
    let a = seed(&db, "Ballpoint Pen", 200, 10, 10).await;
    let b = seed(&db, "Pencil HB", 80, 30, 10).await;
    let c = seed(&db, "Notebook A5", 550, 12, 10).await;

    let all = db.products().list_all().await.unwrap();
    let ids: Vec<i64> = all.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![a.id, b.id, c.id]);
    assert_eq!(db.products().count().await.unwrap(), 3);
}
