use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use server::{build_app, ServerConfig};
use std::fs;
use std::path::Path;
use tempfile::tempdir;
use tower::ServiceExt;

const TOKEN: &str = "s3cret";

fn write_corpus(path: &Path, extra: &str) {
    let json = format!(
        r#"[
            {{"title": "Sonnet 2: All you need", "author": "William Shakespeare", "lines": ["All you need is love"], "linecount": "1"}},
            {{"title": "Sonnet 1: Love is blind", "author": "William Shakespeare", "lines": ["Love is blind", "and lovers cannot see"], "linecount": "2"}}
            {extra}
        ]"#
    );
    fs::write(path, json).unwrap();
}

fn app(corpus: &Path) -> Router {
    build_app(ServerConfig {
        corpus: corpus.to_path_buf(),
        admin_token: Some(TOKEN.into()),
        cors_allow_origin: None,
    })
    .unwrap()
}

async fn call(app: Router, req: Request<Body>) -> (StatusCode, Vec<u8>) {
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let body = resp.into_body().collect().await.unwrap().to_bytes().to_vec();
    (status, body)
}

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let (status, body) = call(app, Request::get(uri).body(Body::empty()).unwrap()).await;
    (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
}

fn ids(json: &Value) -> Vec<u64> {
    json["results"].as_array().unwrap().iter().map(|r| r["doc_id"].as_u64().unwrap()).collect()
}

#[tokio::test]
async fn search_returns_conjunctive_matches_in_id_order() {
    let dir = tempdir().unwrap();
    let corpus = dir.path().join("sonnets.json");
    write_corpus(&corpus, "");
    let app = app(&corpus);

    let (status, json) = get(app.clone(), "/search?q=love").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&json), vec![1, 2]);
    assert_eq!(json["total_hits"], 2);
    assert_eq!(json["results"][0]["snippet"], "<em>Love</em> is blind");

    let (_, json) = get(app.clone(), "/search?q=love%20blind").await;
    assert_eq!(ids(&json), vec![1]);

    let (_, json) = get(app.clone(), "/search?q=love%2C").await;
    assert_eq!(ids(&json), vec![1, 2]);
    assert_eq!(json["results"][0]["snippet"], "<em>Love</em> is blind");

    let (_, json) = get(app.clone(), "/search?q=hate").await;
    assert!(ids(&json).is_empty());

    let (_, json) = get(app.clone(), "/search?q=").await;
    assert!(ids(&json).is_empty());

    let (_, json) = get(app, "/search?q=love&k=1").await;
    assert_eq!(ids(&json), vec![1]);
    assert_eq!(json["total_hits"], 2);
}

#[tokio::test]
async fn doc_endpoint_resolves_ids() {
    let dir = tempdir().unwrap();
    let corpus = dir.path().join("sonnets.json");
    write_corpus(&corpus, "");
    let app = app(&corpus);

    let (status, json) = get(app.clone(), "/doc/2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["title"], "All you need");
    assert_eq!(json["lines"][0], "All you need is love");

    let (status, json) = get(app, "/doc/99").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "not found");
}

#[tokio::test]
async fn reload_swaps_index_and_keeps_old_one_on_failure() {
    let dir = tempdir().unwrap();
    let corpus = dir.path().join("sonnets.json");
    write_corpus(&corpus, "");
    let app = app(&corpus);

    let reload = |token: &str| Request::post("/index/reload").header("X-ADMIN-TOKEN", token).body(Body::empty()).unwrap();

    let (status, body) = call(app.clone(), reload("wrong")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(String::from_utf8_lossy(&body), "invalid X-ADMIN-TOKEN to reload the index");

    write_corpus(&corpus, r#", {"title": "Sonnet 3: Hate", "lines": ["Love and hate"]}"#);
    let (status, body) = call(app.clone(), reload(TOKEN)).await;
    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["num_docs"], 3);
    let (_, json) = get(app.clone(), "/search?q=love").await;
    assert_eq!(ids(&json), vec![1, 2, 3]);

    write_corpus(&corpus, r#", {"title": "Sonnet 1: Again", "lines": ["hate"]}"#);
    let (status, body) = call(app.clone(), reload(TOKEN)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(String::from_utf8_lossy(&body).contains("duplicate document identifier: 1"));
    let (_, json) = get(app, "/search?q=hate").await;
    assert_eq!(ids(&json), vec![3]);
}

#[test]
fn duplicate_ids_prevent_startup() {
    let dir = tempdir().unwrap();
    let corpus = dir.path().join("sonnets.json");
    write_corpus(&corpus, r#", {"title": "Sonnet 2: Twice", "lines": ["x"]}"#);
    let err = build_app(ServerConfig { corpus, ..Default::default() }).unwrap_err();
    assert!(format!("{err:#}").contains("duplicate document identifier: 2"));
}

#[tokio::test]
async fn reload_is_refused_without_a_configured_token() {
    let dir = tempdir().unwrap();
    let corpus = dir.path().join("sonnets.json");
    write_corpus(&corpus, "");
    let app = build_app(ServerConfig { corpus, ..Default::default() }).unwrap();
    let req = Request::post("/index/reload").header("X-ADMIN-TOKEN", TOKEN).body(Body::empty()).unwrap();
    let (status, body) = call(app, req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(String::from_utf8_lossy(&body), "ADMIN_TOKEN must be set to reload the index");
}

#[test]
fn missing_corpus_prevents_startup() {
    let dir = tempdir().unwrap();
    let err = build_app(ServerConfig { corpus: dir.path().join("absent.json"), ..Default::default() }).unwrap_err();
    assert!(format!("{err:#}").contains("corpus not found"));
}
