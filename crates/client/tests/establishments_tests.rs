//! Integration tests for the establishment CRUD methods and the response cache

use padron_client::{EstablishmentListParams, PadronClient, PadronError};
use padron_core::{EstablishmentCreate, EstablishmentPatch};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn establishment_json(id: i64, name: &str) -> serde_json::Value {
    json!({
        "id": id,
        "name": name,
        "address": "Av. Arequipa 100",
        "email": null,
        "telephone": null,
        "location": "150101",
        "has_internet_sales": true,
        "has_courier": false,
        "code": null
    })
}

fn page_json(results: Vec<serde_json::Value>) -> serde_json::Value {
    json!({
        "count": results.len(),
        "next": null,
        "previous": null,
        "results": results
    })
}

fn valid_create() -> EstablishmentCreate {
    EstablishmentCreate {
        name: "Norte".to_string(),
        address: "Av. Arequipa 100".to_string(),
        location: "150101".to_string(),
        ..Default::default()
    }
}

#[tokio::test]
async fn list_sends_pagination_and_search_params() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/core/establishments/"))
        .and(query_param("page", "2"))
        .and(query_param("page_size", "25"))
        .and(query_param("search", "norte"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(page_json(vec![establishment_json(1, "Norte")])),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = PadronClient::new(mock_server.uri()).unwrap();
    let params = EstablishmentListParams {
        page: 2,
        page_size: 25,
        search: Some("norte".to_string()),
    };
    let listing = client.list_establishments(&params).await.unwrap();

    assert_eq!(listing.count, 1);
    assert_eq!(listing.results[0].name, "Norte");
}

#[tokio::test]
async fn list_omits_search_when_absent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/core/establishments/"))
        .and(query_param("page", "1"))
        .and(query_param("page_size", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json(vec![])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = PadronClient::new(mock_server.uri()).unwrap();
    let listing = client
        .list_establishments(&EstablishmentListParams::default())
        .await
        .unwrap();
    assert_eq!(listing.count, 0);
}

#[tokio::test]
async fn repeated_reads_are_served_from_cache() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/core/establishments/"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(page_json(vec![establishment_json(1, "Norte")])),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = PadronClient::new(mock_server.uri()).unwrap();
    let params = EstablishmentListParams::default();

    let first = client.list_establishments(&params).await.unwrap();
    let second = client.list_establishments(&params).await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn create_validates_before_dispatch() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/core/establishments/"))
        .respond_with(ResponseTemplate::new(201).set_body_json(establishment_json(1, "x")))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = PadronClient::new(mock_server.uri()).unwrap();
    let error = client
        .create_establishment(&EstablishmentCreate::default())
        .await
        .unwrap_err();

    match error {
        PadronError::Validation(validation) => {
            assert_eq!(validation.messages(), vec!["El nombre es obligatorio"]);
        }
        other => panic!("expected Validation error, got {other:?}"),
    }
}

#[tokio::test]
async fn create_primes_the_item_cache_and_invalidates_lists() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/core/establishments/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json(vec![])))
        .expect(2)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/core/establishments/"))
        .respond_with(ResponseTemplate::new(201).set_body_json(establishment_json(9, "Norte")))
        .expect(1)
        .mount(&mock_server)
        .await;

    // The freshly created establishment is served from cache, not the network.
    Mock::given(method("GET"))
        .and(path("/core/establishments/9/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(establishment_json(9, "Norte")))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = PadronClient::new(mock_server.uri()).unwrap();
    let params = EstablishmentListParams::default();

    client.list_establishments(&params).await.unwrap();
    let created = client.create_establishment(&valid_create()).await.unwrap();
    assert_eq!(created.id, Some(9));

    let cached = client.get_establishment(9).await.unwrap();
    assert_eq!(cached.name, "Norte");

    // The list cache was invalidated by the create.
    client.list_establishments(&params).await.unwrap();
}

#[tokio::test]
async fn update_collects_every_patch_violation_before_dispatch() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/core/establishments/1/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(establishment_json(1, "x")))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = PadronClient::new(mock_server.uri()).unwrap();
    let patch = EstablishmentPatch {
        name: Some(String::new()),
        email: Some("broken".to_string()),
        ..Default::default()
    };
    let error = client.update_establishment(1, &patch).await.unwrap_err();

    match error {
        PadronError::Validation(validation) => {
            assert_eq!(
                validation.messages(),
                vec!["El nombre es obligatorio", "Formato inválido"]
            );
        }
        other => panic!("expected Validation error, got {other:?}"),
    }
}

#[tokio::test]
async fn update_refreshes_the_item_cache() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/core/establishments/4/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(establishment_json(4, "Renombrado")))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/core/establishments/4/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(establishment_json(4, "Viejo")))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = PadronClient::new(mock_server.uri()).unwrap();
    let patch = EstablishmentPatch {
        name: Some("Renombrado".to_string()),
        ..Default::default()
    };
    client.update_establishment(4, &patch).await.unwrap();

    let cached = client.get_establishment(4).await.unwrap();
    assert_eq!(cached.name, "Renombrado");
}

#[tokio::test]
async fn delete_drops_the_item_from_cache() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/core/establishments/5/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(establishment_json(5, "Sur")))
        .expect(2)
        .mount(&mock_server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/core/establishments/5/"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = PadronClient::new(mock_server.uri()).unwrap();

    client.get_establishment(5).await.unwrap();
    client.delete_establishment(5).await.unwrap();
    // The cached entry is gone; this read hits the network again.
    client.get_establishment(5).await.unwrap();
}

#[tokio::test]
async fn backend_error_shape_passes_through_unchanged() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/core/establishments/6/"))
        .respond_with(ResponseTemplate::new(400).set_body_json(
            json!({"code": 400, "codestring": "BAD_INPUT", "message": "x", "meta": {"field": "name"}}),
        ))
        .mount(&mock_server)
        .await;

    let client = PadronClient::new(mock_server.uri()).unwrap();
    let error = client.get_establishment(6).await.unwrap_err();

    match error {
        PadronError::Api(api) => {
            assert_eq!(api.code, 400);
            assert_eq!(api.codestring, "BAD_INPUT");
            assert_eq!(api.message, "x");
            assert_eq!(api.meta, Some(json!({"field": "name"})));
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn unstructured_backend_error_falls_back_to_defaults() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/core/establishments/7/"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"detail": "x"})))
        .mount(&mock_server)
        .await;

    let client = PadronClient::new(mock_server.uri()).unwrap();
    let error = client.get_establishment(7).await.unwrap_err();

    match error {
        PadronError::Api(api) => {
            assert_eq!(api.code, 500);
            assert_eq!(api.codestring, "API_ERROR");
            assert_eq!(api.message, "Error desconocido en el servidor");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}
