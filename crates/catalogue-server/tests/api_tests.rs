//! HTTP level tests of the onboarding flow and the read-only surfaces

mod support;

use axum::http::{Method, StatusCode};
use serde_json::json;

use support::{provider_json, record_json, service_json, TestApp, ADMIN, EPOT, OWNER};

#[tokio::test]
async fn test_health() {
    let app = TestApp::new().await;
    let (status, json) = app.get("/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
}

#[tokio::test]
async fn test_provider_onboarding() {
    let app = TestApp::new().await;

    let (status, json) = app
        .call(Method::POST, "/api/v1/providers", Some(OWNER), Some(provider_json("ATHENA")))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["success"], true);
    assert_eq!(json["data"]["id"], "athena");
    assert_eq!(json["data"]["status"], "pending provider");
    assert_eq!(json["data"]["active"], false);

    // Pending providers are only visible to their administrators
    let (status, json) = app.get("/api/v1/providers/athena", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["success"], false);
    let (status, _) = app.get("/api/v1/providers/athena", Some(OWNER)).await;
    assert_eq!(status, StatusCode::OK);

    // Only the portal staff verify
    let uri = "/api/v1/providers/athena/verify?status=approved%20provider&active=true";
    let (status, json) = app.call(Method::PATCH, uri, Some(OWNER), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(json["error"]["code"], "FORBIDDEN");

    let (status, json) = app.call(Method::PATCH, uri, Some(EPOT), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["status"], "approved provider");
    assert_eq!(json["data"]["active"], true);

    let (status, json) = app.get("/api/v1/public/providers/eosc.athena", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["identifiers"]["originalId"], "athena");
    assert_eq!(json["data"]["payload"]["users"], json!([]));

    assert!(!app.mail.sent().await.is_empty());
}

#[tokio::test]
async fn test_duplicate_provider_conflicts() {
    let app = TestApp::new().await;
    app.approved_provider("ATHENA").await;

    let (status, json) = app
        .call(Method::POST, "/api/v1/providers", Some(OWNER), Some(provider_json("ATHENA")))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["error"]["code"], "CONFLICT");
}

#[tokio::test]
async fn test_invalid_provider_is_unprocessable() {
    let app = TestApp::new().await;
    let mut body = provider_json("ATHENA");
    body["website"] = json!("not a url");

    let (status, json) = app.call(Method::POST, "/api/v1/providers", Some(OWNER), Some(body)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_anonymous_cannot_register() {
    let app = TestApp::new().await;
    let (status, _) = app
        .call(Method::POST, "/api/v1/providers", None, Some(provider_json("ATHENA")))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_service_template_flow() {
    let app = TestApp::new().await;
    let provider_id = app.approved_provider("ATHENA").await;

    // The first service is the template and waits for review
    let (status, json) = app
        .call(Method::POST, "/api/v1/services", Some(OWNER), Some(service_json(&provider_id, "TEXTMINER")))
        .await;
    assert_eq!(status, StatusCode::CREATED, "{json}");
    assert_eq!(json["data"]["id"], "athena.textminer");
    assert_eq!(json["data"]["status"], "pending resource");

    // No second resource while the template is under review
    let (status, _) = app
        .call(Method::POST, "/api/v1/services", Some(OWNER), Some(service_json(&provider_id, "GRAPH")))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let uri = "/api/v1/services/athena.textminer/verify?status=approved%20resource";
    let (status, json) = app.call(Method::PATCH, uri, Some(ADMIN), None).await;
    assert_eq!(status, StatusCode::OK, "{json}");
    assert_eq!(json["data"]["active"], true);

    let (_, json) = app.get("/api/v1/providers/athena", Some(OWNER)).await;
    assert_eq!(json["data"]["templateStatus"], "approved template");

    // Once the template is approved, resources are approved on registration
    let (status, json) = app
        .call(Method::POST, "/api/v1/services", Some(OWNER), Some(service_json(&provider_id, "GRAPH")))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["data"]["status"], "approved resource");

    let (status, json) = app.get("/api/v1/public/services", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["meta"]["total"], 2);
    let first = &json["data"][0];
    assert_eq!(first["payload"]["resourceOrganisation"], "eosc.athena");
    assert!(first["payload"].get("mainContact").is_none());
}

#[tokio::test]
async fn test_interoperability_links_go_with_their_service() {
    let app = TestApp::new().await;
    let provider_id = app.approved_provider("ATHENA").await;

    let (status, json) = app
        .call(Method::POST, "/api/v1/services", Some(OWNER), Some(service_json(&provider_id, "TEXTMINER")))
        .await;
    assert_eq!(status, StatusCode::CREATED, "{json}");
    let uri = "/api/v1/services/athena.textminer/verify?status=approved%20resource";
    let (status, _) = app.call(Method::PATCH, uri, Some(ADMIN), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, json) = app
        .call(Method::POST, "/api/v1/interoperability-records", Some(OWNER), Some(record_json(&provider_id, "10.1234/abc")))
        .await;
    assert_eq!(status, StatusCode::CREATED, "{json}");
    let record_id = json["data"]["id"].as_str().expect("record id").to_string();
    let uri = format!("/api/v1/interoperability-records/{record_id}/verify?status=approved%20interoperability%20record");
    let (status, _) = app.call(Method::PATCH, &uri, Some(ADMIN), None).await;
    assert_eq!(status, StatusCode::OK);

    let link = json!({ "resourceId": "athena.textminer", "interoperabilityRecordIds": [record_id] });
    let (status, json) = app
        .call(
            Method::POST,
            "/api/v1/resource-interoperability-records?resourceType=service",
            Some(OWNER),
            Some(link),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{json}");
    assert_eq!(json["data"]["id"], "athena.textminer.interoperability");

    let (status, json) = app
        .get("/api/v1/resource-interoperability-records/by-resource/athena.textminer", None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["payload"]["interoperabilityRecordIds"][0], record_id.as_str());

    let (status, _) = app.call(Method::DELETE, "/api/v1/services/athena.textminer", Some(OWNER), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, json) = app
        .get("/api/v1/resource-interoperability-records/by-resource/athena.textminer", None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(json["data"].is_null());
    let (_, json) = app.get("/api/v1/resource-interoperability-records", Some(ADMIN)).await;
    assert_eq!(json["meta"]["total"], 0);
}

#[tokio::test]
async fn test_unknown_ids_are_not_found() {
    let app = TestApp::new().await;
    let (status, json) = app.get("/api/v1/services/nowhere.nothing", Some(ADMIN)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"]["code"], "NOT_FOUND");
    assert_eq!(json["error"]["message"], "Service with id 'nowhere.nothing' does not exist!");
}

#[tokio::test]
async fn test_vocabularies() {
    let app = TestApp::new().await;

    let (status, json) = app.get("/api/v1/vocabularies/by-type/Provider%20state", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"].as_array().map(Vec::len), Some(3));

    let body = json!([
        { "id": "country-gr", "name": "Greece", "type": "Country", "extras": { "region": "EU" } },
        { "id": "country-jp", "name": "Japan", "type": "Country", "extras": { "region": "AS" } }
    ]);
    let (status, _) = app.call(Method::POST, "/api/v1/vocabularies/bulk", Some(OWNER), Some(body.clone())).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, json) = app.call(Method::POST, "/api/v1/vocabularies/bulk", Some(ADMIN), Some(body)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["data"].as_array().map(Vec::len), Some(2));

    let (_, json) = app.get("/api/v1/vocabularies/countries/EU", None).await;
    assert_eq!(json["data"], json!(["country-gr"]));
    let (_, json) = app.get("/api/v1/vocabularies/countries/WW", None).await;
    assert_eq!(json["data"], json!(["country-gr", "country-jp"]));

    let (status, json) = app.get("/api/v1/vocabularies/country-gr", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["name"], "Greece");
}

#[tokio::test]
async fn test_stats_without_matomo() {
    let app = TestApp::new().await;
    let (status, json) = app.get("/api/v1/stats/visits/athena.textminer", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"], 0);

    let (status, json) = app.get("/api/v1/stats/visits/label/athena?by=month", None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(json["error"]["code"], "UNAVAILABLE");
}
