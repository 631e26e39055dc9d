use axum::http::StatusCode;
use serde_json::json;

mod helpers;

#[tokio::test]
async fn register_login_and_me() -> anyhow::Result<()> {
    let app = helpers::setup_test_app().await?;

    let (id, token) = app.signup("john").await?;

    let res = app.get("/api/users/me", Some(&token)).await?;
    assert_eq!(res.status, StatusCode::OK);
    let me = res.json();
    assert_eq!(me["id"], id);
    assert_eq!(me["email"], "john@pantry.localhost");
    assert_eq!(me["is_subscribed"], false);
    assert!(me.get("password").is_none());

    let res = app.get("/api/users/me", None).await?;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);

    let res = app.get("/api/users/me", Some("not-a-token")).await?;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);

    let res = app.post("/api/auth/token/logout", Some(&token), None).await?;
    assert_eq!(res.status, StatusCode::NO_CONTENT);

    Ok(())
}

#[tokio::test]
async fn register_rejects_taken_email() -> anyhow::Result<()> {
    let app = helpers::setup_test_app().await?;
    app.signup("john").await?;

    let res = app
        .post(
            "/api/users",
            None,
            Some(json!({
                "email": "john@pantry.localhost",
                "username": "johnny",
                "first_name": "John",
                "last_name": "Doe",
                "password": "my_password",
            })),
        )
        .await?;

    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.json()["detail"], "A user with that email already exists.");

    let res = app
        .post("/api/users", None, Some(json!({ "email": "john@pantry.localhost" })))
        .await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);

    Ok(())
}

#[tokio::test]
async fn login_with_wrong_password() -> anyhow::Result<()> {
    let app = helpers::setup_test_app().await?;
    app.signup("john").await?;

    let res = app
        .post(
            "/api/auth/token/login",
            None,
            Some(json!({ "email": "john@pantry.localhost", "password": "wrong_password" })),
        )
        .await?;

    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        res.json()["detail"],
        "Unable to log in with provided credentials."
    );

    Ok(())
}

#[tokio::test]
async fn set_password_then_login() -> anyhow::Result<()> {
    let app = helpers::setup_test_app().await?;
    let (_, token) = app.signup("john").await?;

    let res = app
        .post(
            "/api/users/set_password",
            Some(&token),
            Some(json!({ "current_password": "bad", "new_password": "new_password" })),
        )
        .await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);

    let res = app
        .post(
            "/api/users/set_password",
            Some(&token),
            Some(json!({ "current_password": "my_password", "new_password": "new_password" })),
        )
        .await?;
    assert_eq!(res.status, StatusCode::NO_CONTENT);

    let res = app
        .post(
            "/api/auth/token/login",
            None,
            Some(json!({ "email": "john@pantry.localhost", "password": "new_password" })),
        )
        .await?;
    assert_eq!(res.status, StatusCode::OK);

    Ok(())
}

#[tokio::test]
async fn users_are_paginated() -> anyhow::Result<()> {
    let app = helpers::setup_test_app().await?;
    for name in ["john", "albert", "marie"] {
        app.signup(name).await?;
    }

    let res = app.get("/api/users?limit=2", None).await?;
    assert_eq!(res.status, StatusCode::OK);
    let page = res.json();
    assert_eq!(page["count"], 3);
    assert_eq!(page["results"].as_array().unwrap().len(), 2);
    assert_eq!(page["next"], "/api/users?limit=2&page=2");
    assert!(page["previous"].is_null());

    let res = app.get("/api/users?limit=2&page=2", None).await?;
    let page = res.json();
    assert_eq!(page["results"].as_array().unwrap().len(), 1);
    assert!(page["next"].is_null());
    assert_eq!(page["previous"], "/api/users?limit=2");

    let res = app.get("/api/users/999", None).await?;
    assert_eq!(res.status, StatusCode::NOT_FOUND);

    Ok(())
}

#[tokio::test]
async fn subscribe_lifecycle() -> anyhow::Result<()> {
    let app = helpers::setup_test_app().await?;
    let (john_id, john) = app.signup("john").await?;
    let (albert_id, albert) = app.signup("albert").await?;
    let tag = app.create_tag("dinner").await?;
    let flour = app.create_ingredient("flour", "g").await?;

    for name in ["Bread", "Cake", "Pie"] {
        app.create_recipe(&albert, name, vec![tag], vec![(flour, 100)])
            .await?;
    }

    let uri = format!("/api/users/{albert_id}/subscribe");

    let res = app
        .post(&format!("/api/users/{john_id}/subscribe"), Some(&john), None)
        .await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.json()["detail"], "You cannot subscribe to yourself.");

    let res = app.post(&uri, Some(&john), None).await?;
    assert_eq!(res.status, StatusCode::CREATED, "{}", res.text());
    let subscription = res.json();
    assert_eq!(subscription["id"], albert_id);
    assert_eq!(subscription["is_subscribed"], true);
    assert_eq!(subscription["recipes_count"], 3);

    let res = app.post(&uri, Some(&john), None).await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);

    let res = app
        .get(&format!("/api/users/{albert_id}"), Some(&john))
        .await?;
    assert_eq!(res.json()["is_subscribed"], true);

    let res = app
        .get("/api/users/subscriptions?recipes_limit=2", Some(&john))
        .await?;
    assert_eq!(res.status, StatusCode::OK);
    let page = res.json();
    assert_eq!(page["count"], 1);
    assert_eq!(page["results"][0]["recipes_count"], 3);
    let recipes = page["results"][0]["recipes"].as_array().unwrap();
    assert_eq!(recipes.len(), 2);
    assert_eq!(recipes[0]["name"], "Pie");

    let res = app
        .get("/api/users/subscriptions?recipes_limit=abc", Some(&john))
        .await?;
    let page = res.json();
    assert_eq!(page["results"][0]["recipes"].as_array().unwrap().len(), 3);

    let res = app.delete(&uri, Some(&john)).await?;
    assert_eq!(res.status, StatusCode::NO_CONTENT);

    let res = app.delete(&uri, Some(&john)).await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.json()["detail"], "Subscription does not exist.");

    let res = app.post("/api/users/999/subscribe", Some(&john), None).await?;
    assert_eq!(res.status, StatusCode::NOT_FOUND);

    Ok(())
}
