#![cfg(feature = "web")]

use std::path::Path;
use std::sync::Arc;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use gss_dashboard::app::{AppState, router};
use gss_dashboard::charts::{RenderedCharts, StaticChart};
use gss_dashboard::loader::parse_csv;
use gss_dashboard::DashboardContext;
use tower::ServiceExt;

const SURVEY: &str = "id,wtss,sex,educ,region,age,coninc,prestg10,mapres10,papres10,sei10,\
satjob,fechld,fefam,fepol,fepresch,meovrwrk
1,1,male,12,pacific,30,20000,40,,,45,very satisfied,agree,agree,disagree,agree,agree
2,1,female,16,pacific,41,35000,55,,,60,mod. satisfied,agree,disagree,disagree,disagree,agree
3,1,male,14,new england,52,,62,,,58,very satisfied,disagree,disagree,IAP,agree,disagree
4,1,female,12,new england,89 or older,15000,30,,,35,a little dissat,agree,agree,agree,agree,agree
";

fn app() -> Router {
    let ctx = DashboardContext::new(parse_csv(SURVEY).expect("fixture parses"));
    let state = AppState::new(ctx, RenderedCharts::default()).expect("page renders");
    router(Arc::new(state), Path::new("static"))
}

async fn get(uri: &str) -> (StatusCode, Vec<u8>) {
    let response = app()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, body.to_vec())
}

#[tokio::test]
async fn crosstab_endpoint_returns_long_rows() {
    let (status, body) = get("/api/crosstab?x=male_breadwinner&y=sex").await;
    assert_eq!(status, StatusCode::OK);

    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["x"], "male_breadwinner");
    assert_eq!(json["y"], "sex");
    // Respondent 3 has a placeholder in fepol and is not a complete case
    let rows = json["rows"].as_array().unwrap();
    assert_eq!(rows.len(), 4);
    let total: u64 = rows.iter().map(|r| r["count"].as_u64().unwrap()).sum();
    assert_eq!(total, 3);
}

#[tokio::test]
async fn missing_selection_is_bad_request() {
    for uri in [
        "/api/crosstab",
        "/api/crosstab?x=satjob",
        "/api/crosstab?y=sex",
        "/api/crosstab/export?format=csv",
        "/charts/crosstab.png?y=region",
    ] {
        let (status, body) = get(uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "error");
    }

    let (_, body) = get("/api/crosstab?x=satjob").await;
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert!(json["message"].as_str().unwrap().contains("y-axis"));
}

#[tokio::test]
async fn invalid_selection_is_bad_request() {
    let (status, body) = get("/api/crosstab?x=income&y=sex").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["status"], "error");
    assert!(json["message"].as_str().unwrap().contains("income"));

    let (status, _) = get("/charts/crosstab.png?x=satjob&y=age").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn options_list_whitelists() {
    let (status, body) = get("/api/options").await;
    assert_eq!(status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["x_options"].as_array().unwrap().len(), 6);
    assert_eq!(json["y_options"], serde_json::json!(["sex", "region", "education"]));
    assert_eq!(json["x_default"], "male_breadwinner");
}

#[tokio::test]
async fn summary_endpoint_groups_by_sex() {
    let (status, body) = get("/api/summary").await;
    assert_eq!(status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json[0]["gender"], "female");
    assert_eq!(json[0]["avg_income"], 25000.0);
    // Respondent 3 has no income; only respondent 1 counts
    assert_eq!(json[1]["avg_income"], 20000.0);
    assert_eq!(json[1]["avg_education"], 13.0);
}

#[tokio::test]
async fn export_downloads_csv() {
    let (status, body) = get("/api/crosstab/export?x=satjob&y=region&format=csv").await;
    assert_eq!(status, StatusCode::OK);
    let text = String::from_utf8(body).unwrap();
    assert!(text.starts_with("satjob,region,Count\n"));
}

#[tokio::test]
async fn page_lists_dropdown_options() {
    let (status, body) = get("/").await;
    assert_eq!(status, StatusCode::OK);
    let html = String::from_utf8(body).unwrap();
    for name in ["satjob", "men_overwork", "education"] {
        assert!(html.contains(&format!("<option value=\"{}\"", name)), "missing {}", name);
    }
    assert!(html.contains("<option value=\"male_breadwinner\" selected>"));
}

#[tokio::test]
async fn page_links_intro_sources() {
    let (_, body) = get("/").await;
    let html = String::from_utf8(body).unwrap();
    assert!(html.contains(
        "<a href=\"https://www.pewresearch.org/short-reads/2023/03/01/gender-pay-gap-facts/\">"
    ));
    assert!(html.contains("<a href=\"https://gssdataexplorer.norc.org/\">"));
}

#[tokio::test]
async fn unknown_static_chart_is_not_found() {
    let (status, _) = get("/charts/static/nope.png").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(StaticChart::from_file_name("prestige_box.png"), Some(StaticChart::PrestigeBox));
    assert_eq!(StaticChart::from_file_name("prestige_box"), None);
}
