#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use http_body_util::BodyExt;
use pantry::config::{
    Config, DatabaseConfig, JwtConfig, MediaConfig, ObservabilityConfig, ServerConfig,
};
use serde_json::Value;
use temp_dir::TempDir;
use tower::ServiceExt;

pub const IMAGE: &str = "data:image/png;base64,aGVsbG8=";

pub struct TestApp {
    pub app: Router,
    pub state: pantry_shared::State,
    pub dir: TempDir,
}

pub async fn setup_test_app() -> anyhow::Result<TestApp> {
    let dir = TempDir::new()?;
    let url = format!("sqlite:{}", dir.child("db.sqlite3").to_str().unwrap());
    let pool = pantry::db::create_pool(&url, 5).await?;
    pantry::migrate(&pool).await?;
    let state = pantry_shared::State::single(pool);

    let config = Config {
        server: ServerConfig {
            host: "127.0.0.1".to_owned(),
            port: 8000,
        },
        database: DatabaseConfig {
            url,
            max_connections: 5,
        },
        jwt: JwtConfig {
            secret: "test_secret_key_minimum_32_characters_long".to_owned(),
            expiration_days: 1,
        },
        media: MediaConfig {
            root: dir.child("media").to_str().unwrap().to_owned(),
            url_prefix: "/media".to_owned(),
        },
        observability: ObservabilityConfig::default(),
    };

    let app = pantry::create_app(pantry::AppState::new(config, state.clone()));

    Ok(TestApp { app, state, dir })
}

pub struct Response {
    pub status: StatusCode,
    pub headers: axum::http::HeaderMap,
    pub body: Vec<u8>,
}

impl Response {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap_or(Value::Null)
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

impl TestApp {
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> anyhow::Result<Response> {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Token {token}"));
        }

        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&body)?))?,
            None => builder.body(Body::empty())?,
        };

        let response = self.app.clone().oneshot(request).await?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.into_body().collect().await?.to_bytes().to_vec();

        Ok(Response {
            status,
            headers,
            body,
        })
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> anyhow::Result<Response> {
        self.send(Method::GET, uri, token, None).await
    }

    pub async fn post(
        &self,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> anyhow::Result<Response> {
        self.send(Method::POST, uri, token, body).await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> anyhow::Result<Response> {
        self.send(Method::DELETE, uri, token, None).await
    }

    /// Number of image files under the media root.
    pub fn stored_images(&self) -> usize {
        std::fs::read_dir(self.dir.path().join("media/recipes/images"))
            .map(|entries| entries.count())
            .unwrap_or_default()
    }

    /// Registers `name` through the API and returns its id and token.
    pub async fn signup(&self, name: &str) -> anyhow::Result<(i64, String)> {
        let res = self
            .post(
                "/api/users",
                None,
                Some(serde_json::json!({
                    "email": format!("{name}@pantry.localhost"),
                    "username": name,
                    "first_name": name,
                    "last_name": "Tester",
                    "password": "my_password",
                })),
            )
            .await?;
        assert_eq!(res.status, StatusCode::CREATED, "{}", res.text());
        let id = res.json()["id"].as_i64().unwrap();

        let res = self
            .post(
                "/api/auth/token/login",
                None,
                Some(serde_json::json!({
                    "email": format!("{name}@pantry.localhost"),
                    "password": "my_password",
                })),
            )
            .await?;
        assert_eq!(res.status, StatusCode::OK, "{}", res.text());
        let token = res.json()["auth_token"].as_str().unwrap().to_owned();

        Ok((id, token))
    }

    pub async fn create_tag(&self, slug: &str) -> anyhow::Result<i64> {
        Ok(pantry_catalog::Command::new(self.state.clone())
            .create_tag(pantry_catalog::CreateTagInput {
                name: slug.to_uppercase(),
                color: "#49b64e".to_owned(),
                slug: slug.to_owned(),
            })
            .await?)
    }

    pub async fn create_ingredient(&self, name: &str, unit: &str) -> anyhow::Result<i64> {
        Ok(pantry_catalog::Command::new(self.state.clone())
            .create_ingredient(pantry_catalog::CreateIngredientInput {
                name: name.to_owned(),
                measurement_unit: unit.to_owned(),
            })
            .await?)
    }

    /// Creates a recipe through the API and returns its id.
    pub async fn create_recipe(
        &self,
        token: &str,
        name: &str,
        tags: Vec<i64>,
        ingredients: Vec<(i64, i64)>,
    ) -> anyhow::Result<i64> {
        let res = self
            .post("/api/recipes", Some(token), Some(recipe_body(name, tags, ingredients)))
            .await?;
        assert_eq!(res.status, StatusCode::CREATED, "{}", res.text());

        Ok(res.json()["id"].as_i64().unwrap())
    }
}

pub fn recipe_body(name: &str, tags: Vec<i64>, ingredients: Vec<(i64, i64)>) -> Value {
    let ingredients: Vec<Value> = ingredients
        .into_iter()
        .map(|(id, amount)| serde_json::json!({ "id": id, "amount": amount }))
        .collect();

    serde_json::json!({
        "name": name,
        "text": format!("How to cook {name}"),
        "image": IMAGE,
        "cooking_time": 30,
        "tags": tags,
        "ingredients": ingredients,
    })
}
