//! Query parameters of `GET /api/v1/tasks`.

use super::helpers::{app, call, create};
use axum::{
    Router,
    http::{Method, StatusCode},
};
use eyre::ensure;
use rstest::rstest;
use serde_json::{Value, json};

async fn seed(app: &Router, tasks: &[(&str, &str)]) -> eyre::Result<()> {
    for (title, status) in tasks {
        create(app, &json!({ "title": title, "status": status })).await?;
    }
    Ok(())
}

fn titles(body: &Value) -> Vec<String> {
    body.as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item["title"].as_str().map(ToOwned::to_owned))
                .collect()
        })
        .unwrap_or_default()
}

#[rstest]
#[case("", &["e", "d", "c", "b", "a"])]
#[case("?skip=0&limit=3", &["e", "d", "c"])]
#[case("?skip=3", &["b", "a"])]
#[case("?status=COMPLETED", &["d", "b"])]
#[case("?status=CREATED&limit=1", &["e"])]
#[case("?status=IN_PROGRESS", &[])]
#[tokio::test(flavor = "multi_thread")]
async fn listing_filters_orders_and_paginates(
    app: Router,
    #[case] query: &str,
    #[case] expected: &[&str],
) -> eyre::Result<()> {
    seed(
        &app,
        &[
            ("a", "CREATED"),
            ("b", "COMPLETED"),
            ("c", "CREATED"),
            ("d", "COMPLETED"),
            ("e", "CREATED"),
        ],
    )
    .await?;

    let response = call(&app, Method::GET, &format!("/api/v1/tasks{query}"), None).await?;

    ensure!(response.status == StatusCode::OK, "status {}", response.status);
    ensure!(
        titles(&response.body) == expected,
        "unexpected listing: {:?}",
        titles(&response.body)
    );
    Ok(())
}

#[rstest]
#[case("?skip=-1", "skip")]
#[case("?limit=0", "limit")]
#[case("?limit=1001", "limit")]
#[case("?status=created", "status")]
#[tokio::test(flavor = "multi_thread")]
async fn invalid_parameters_are_rejected(
    app: Router,
    #[case] query: &str,
    #[case] field: &str,
) -> eyre::Result<()> {
    let response = call(&app, Method::GET, &format!("/api/v1/tasks{query}"), None).await?;

    ensure!(
        response.status == StatusCode::UNPROCESSABLE_ENTITY,
        "status {}",
        response.status
    );
    ensure!(response.body["field"] == field, "field {}", response.body["field"]);
    Ok(())
}
