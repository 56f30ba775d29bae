use diesel::{ExpressionMethods, RunQueryDsl};
use order_management::schema::products;
use rust_decimal::Decimal;

use crate::helpers::TestApp;

#[actix_web::test]
async fn post_order_totals_lines_and_decrements_stock(){
    let app = TestApp::spawn_app().await;

    let customer_id = app.create_customer("Grant").await;
    let product_id = app.create_product("Cable", 19.99, 100).await;
    assert_eq!((customer_id, product_id), (1, 1));

    let response = app.post_json("/orders", &serde_json::json!({
        "customer_id": 1,
        "products": [{ "product_id": 1, "quantity": 5 }]
    })).await;

    assert_eq!(response.status().as_u16(), 201);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["id"], 1);
    assert_eq!(body["customer_id"], 1);
    assert_eq!(body["order_total"].as_f64(), Some(99.95));
    assert!(body["order_date"].is_string());
    assert!(body["delivery_date"].is_null());
    assert_eq!(body["products"], serde_json::json!([
        { "product_id": 1, "name": "Cable", "price": 19.99, "quantity": 5 }
    ]));

    assert_eq!(app.stock_of(1), 95);
}

#[actix_web::test]
async fn post_order_applies_every_line_in_caller_order(){
    let app = TestApp::spawn_app().await;

    let customer_id = app.create_customer("Grant").await;
    let first = app.create_product("item 1", 10.5, 50).await;
    let second = app.create_product("item 2", 4.25, 75).await;

    let response = app.post_json("/orders", &serde_json::json!({
        "customer_id": customer_id,
        "delivery_date": "2024-12-15",
        "products": [
            { "product_id": second, "quantity": 3 },
            { "product_id": first }
        ]
    })).await;

    assert_eq!(response.status().as_u16(), 201);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["order_total"].as_f64(), Some(3.0 * 4.25 + 10.5));
    assert_eq!(body["delivery_date"], "2024-12-15T00:00:00");

    let lines = body["products"].as_array().unwrap();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["product_id"], second);
    assert_eq!(lines[0]["quantity"], 3);
    assert_eq!(lines[1]["product_id"], first);
    assert_eq!(lines[1]["quantity"], 1);

    assert_eq!(app.stock_of(first), 49);
    assert_eq!(app.stock_of(second), 72);
}

#[actix_web::test]
async fn insufficient_stock_rolls_back_the_whole_order(){
    let app = TestApp::spawn_app().await;

    let customer_id = app.create_customer("Grant").await;
    let plenty = app.create_product("Cable", 19.99, 95).await;
    let scarce = app.create_product("Plug", 2.0, 1).await;

    let response = app.post_json("/orders", &serde_json::json!({
        "customer_id": customer_id,
        "products": [
            { "product_id": plenty, "quantity": 2 },
            { "product_id": scarce, "quantity": 5 }
        ]
    })).await;

    assert_eq!(response.status().as_u16(), 400);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Insufficient stock for product Plug. Requested: 5, Available: 1");

    assert_eq!(app.stock_of(plenty), 95);
    assert_eq!(app.stock_of(scarce), 1);
    assert_eq!(app.order_count(), 0);
    assert_eq!(app.order_product_count(), 0);
}

#[actix_web::test]
async fn quantity_above_stock_is_rejected(){
    let app = TestApp::spawn_app().await;

    let customer_id = app.create_customer("Grant").await;
    let product_id = app.create_product("Cable", 19.99, 95).await;

    let response = app.post_json("/orders", &serde_json::json!({
        "customer_id": customer_id,
        "products": [{ "product_id": product_id, "quantity": 1000 }]
    })).await;

    assert_eq!(response.status().as_u16(), 400);
    assert_eq!(app.stock_of(product_id), 95);
    assert_eq!(app.order_count(), 0);
}

#[actix_web::test]
async fn unknown_product_rolls_back_earlier_lines(){
    let app = TestApp::spawn_app().await;

    let customer_id = app.create_customer("Grant").await;
    let product_id = app.create_product("Cable", 19.99, 10).await;

    let response = app.post_json("/orders", &serde_json::json!({
        "customer_id": customer_id,
        "products": [
            { "product_id": product_id, "quantity": 4 },
            { "product_id": 999, "quantity": 1 }
        ]
    })).await;

    assert_eq!(response.status().as_u16(), 404);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Product 999 not found");

    assert_eq!(app.stock_of(product_id), 10);
    assert_eq!(app.order_count(), 0);
    assert_eq!(app.order_product_count(), 0);
}

#[actix_web::test]
async fn unknown_customer_is_not_found(){
    let app = TestApp::spawn_app().await;

    let product_id = app.create_product("Cable", 19.99, 10).await;

    let response = app.post_json("/orders", &serde_json::json!({
        "customer_id": 42,
        "products": [{ "product_id": product_id, "quantity": 1 }]
    })).await;

    assert_eq!(response.status().as_u16(), 404);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Customer not found");

    assert_eq!(app.stock_of(product_id), 10);
    assert_eq!(app.order_count(), 0);
}

#[actix_web::test]
async fn malformed_order_requests_are_bad_requests(){
    let app = TestApp::spawn_app().await;

    let customer_id = app.create_customer("Grant").await;
    let product_id = app.create_product("Cable", 19.99, 10).await;

    let cases = [
        serde_json::json!({ "products": [] }),
        serde_json::json!({ "customer_id": customer_id }),
        serde_json::json!({ "customer_id": customer_id, "products": [{ "product_id": product_id, "quantity": 0 }] }),
        serde_json::json!({ "customer_id": customer_id, "products": [{ "product_id": product_id }, { "product_id": product_id }] }),
        serde_json::json!({ "customer_id": customer_id, "delivery_date": "soon", "products": [{ "product_id": product_id }] }),
        serde_json::json!({ "customer_id": "one", "products": [] }),
    ];

    for body in cases {
        let response = app.post_json("/orders", &body).await;
        assert_eq!(response.status().as_u16(), 400, "Request {} was not rejected", body);
    }

    assert_eq!(app.stock_of(product_id), 10);
    assert_eq!(app.order_count(), 0);
}

#[actix_web::test]
async fn get_orders_is_stable_without_writes(){
    let app = TestApp::spawn_app().await;

    let customer_id = app.create_customer("Grant").await;
    let product_id = app.create_product("Cable", 19.99, 10).await;

    for quantity in [1, 2] {
        let response = app.post_json("/orders", &serde_json::json!({
            "customer_id": customer_id,
            "products": [{ "product_id": product_id, "quantity": quantity }]
        })).await;
        assert_eq!(response.status().as_u16(), 201);
    }

    let first = app.get("/orders").await;
    assert_eq!(first.status().as_u16(), 200);
    let first: serde_json::Value = first.json().await.unwrap();

    let second: serde_json::Value = app.get("/orders").await.json().await.unwrap();

    assert_eq!(first, second);
    assert_eq!(first.as_array().unwrap().len(), 2);
    assert_eq!(first[1]["order_total"].as_f64(), Some(39.98));
}

#[actix_web::test]
async fn listed_orders_keep_the_price_paid(){
    let app = TestApp::spawn_app().await;

    let customer_id = app.create_customer("Grant").await;
    let product_id = app.create_product("Cable", 19.99, 10).await;

    let response = app.post_json("/orders", &serde_json::json!({
        "customer_id": customer_id,
        "products": [{ "product_id": product_id, "quantity": 2 }]
    })).await;
    assert_eq!(response.status().as_u16(), 201);

    let mut conn = app.pool.get().unwrap();
    diesel::update(products::table)
        .filter(products::id.eq(product_id))
        .set(products::price.eq(Decimal::new(2500, 2)))
        .execute(&mut conn)
        .unwrap();

    let orders: serde_json::Value = app.get("/orders").await.json().await.unwrap();

    assert_eq!(orders[0]["order_total"].as_f64(), Some(39.98));
    assert_eq!(orders[0]["products"][0]["price"].as_f64(), Some(19.99));
}

#[actix_web::test]
async fn concurrent_orders_never_oversell(){
    let app = TestApp::spawn_app().await;

    let customer_id = app.create_customer("Grant").await;
    let product_id = app.create_product("Cable", 1.0, 5).await;

    let url = format!("{}/orders", app.get_app_url());
    let handles: Vec<_> = (0..8).map(|_| {
        let client = app.api_client.clone();
        let url = url.clone();
        let body = serde_json::json!({
            "customer_id": customer_id,
            "products": [{ "product_id": product_id, "quantity": 1 }]
        });

        tokio::task::spawn(async move {
            client.post(url).json(&body).send().await.unwrap().status().as_u16()
        })
    }).collect();

    let mut statuses = Vec::new();
    for handle in handles {
        statuses.push(handle.await.unwrap());
    }

    assert_eq!(statuses.iter().filter(|s| **s == 201).count(), 5);
    assert_eq!(statuses.iter().filter(|s| **s == 400).count(), 3);
    assert_eq!(app.stock_of(product_id), 0);
    assert_eq!(app.order_count(), 5);
}

#[actix_web::test]
async fn order_total_beyond_decimal_range_is_rejected(){
    let app = TestApp::spawn_app().await;

    let customer_id = app.create_customer("Grant").await;

    let response = app.post_json("/products", &serde_json::json!({
        "name": "Yacht",
        "price": "50000000000000000000000000000",
        "stock": 10
    })).await;
    assert_eq!(response.status().as_u16(), 201);
    let product_id = response.json::<serde_json::Value>().await.unwrap()["id"].as_i64().unwrap() as i32;

    let response = app.post_json("/orders", &serde_json::json!({
        "customer_id": customer_id,
        "products": [{ "product_id": product_id, "quantity": 2 }]
    })).await;

    assert_eq!(response.status().as_u16(), 400);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], format!("Order total for product {} exceeds the supported amount", product_id));

    assert_eq!(app.stock_of(product_id), 10);
    assert_eq!(app.order_count(), 0);
    assert_eq!(app.order_product_count(), 0);
}

#[actix_web::test]
async fn unknown_customer_is_reported_before_line_problems(){
    let app = TestApp::spawn_app().await;

    let product_id = app.create_product("Cable", 19.99, 10).await;

    for products in [
        serde_json::json!([{ "product_id": product_id, "quantity": 0 }]),
        serde_json::json!([{ "product_id": product_id }, { "product_id": product_id }]),
    ] {
        let response = app.post_json("/orders", &serde_json::json!({
            "customer_id": 42,
            "products": products
        })).await;

        assert_eq!(response.status().as_u16(), 404);

        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(body["error"], "Customer not found");
    }

    assert_eq!(app.stock_of(product_id), 10);
    assert_eq!(app.order_count(), 0);
}
