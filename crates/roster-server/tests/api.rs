use axum::{
    body::{to_bytes, Body},
    http::{header::CONTENT_TYPE, Request, StatusCode},
    Router,
};
use roster_core::domain::{Gender, ParticipantDraft};
use roster_server::{router, AppState};
use roster_store::Store;
use serde_json::{json, Value};
use tower::ServiceExt;

fn app_with(drafts: Vec<ParticipantDraft>) -> Router {
    let store = Store::open_in_memory().expect("open in memory");
    store.migrate().expect("migrate");
    for (offset, draft) in drafts.into_iter().enumerate() {
        store
            .participants()
            .create(1_700_000_000 + offset as i64, draft)
            .expect("seed participant");
    }
    router(AppState::new(store))
}

fn seeded() -> Router {
    app_with(vec![
        ParticipantDraft {
            email: Some("marie@example.com".to_string()),
            phone: Some("+243991234567".to_string()),
            full_name: Some("Marie Kabila".to_string()),
            gender: Some(Gender::Female),
            company: Some("Rawbank".to_string()),
            ..Default::default()
        },
        ParticipantDraft {
            email: Some("jean@example.com".to_string()),
            first_name: Some("Jean".to_string()),
            last_name: Some("Mbala".to_string()),
            degree: Some("Licence".to_string()),
            ..Default::default()
        },
    ])
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, body)
}

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    send(app, Request::get(uri).body(Body::empty()).expect("request")).await
}

async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::post(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request");
    send(app, request).await
}

#[tokio::test]
async fn health_reports_ok() {
    let (status, body) = get(seeded(), "/api/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "roster");
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn list_returns_badge_cards_newest_first() {
    let (status, body) = get(seeded(), "/api/participants").await;
    assert_eq!(status, StatusCode::OK);
    let cards = body.as_array().expect("array");
    assert_eq!(cards.len(), 2);
    assert_eq!(cards[0]["name"], "Jean Mbala");
    assert_eq!(cards[0]["phone"], "N/A");
    assert_eq!(cards[0]["education"], "Licence");
    assert_eq!(cards[1]["company"], "Rawbank");
    assert_eq!(cards[1]["status"], "registered");
}

#[tokio::test]
async fn participant_by_id_and_email() {
    let app = seeded();
    let (status, body) = get(app.clone(), "/api/participants/1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "marie@example.com");

    let (status, _) = get(app.clone(), "/api/participants/99").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = get(app.clone(), "/api/participants/abc").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = get(app.clone(), "/api/participants/email/MARIE@example.com").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], 1);

    let (status, body) = post_json(
        app.clone(),
        "/api/participants/email",
        json!({ "email": "jean@example.com" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], 2);

    let (status, body) = post_json(app.clone(), "/api/participants/email", json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "email is required");

    let (status, _) = post_json(
        app,
        "/api/participants/email",
        json!({ "email": "nobody@example.com" }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn search_count_and_stats() {
    let app = seeded();
    let (status, body) = get(app.clone(), "/api/participants/search?q=kabila").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().expect("array").len(), 1);

    let (status, _) = get(app.clone(), "/api/participants/search").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body) = get(app.clone(), "/api/count").await;
    assert_eq!(body, json!({ "count": 2 }));

    let (status, body) = get(app, "/api/stats").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 2);
    assert_eq!(body["withPhone"], 1);
    assert!(body["byGender"].is_array());
    assert_eq!(body["payments"], json!([]));
}

#[tokio::test]
async fn check_registration_by_email_and_phone() {
    let app = seeded();
    let (status, body) =
        get(app.clone(), "/api/check-registration?email=Marie%40Example.com").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["isRegistered"], true);
    assert_eq!(body["matchedBy"], "email");
    assert_eq!(body["participant"]["name"], "Marie Kabila");

    let (_, body) = get(app.clone(), "/api/check-registration?phone=99%20123%204567").await;
    assert_eq!(body["isRegistered"], true);
    assert_eq!(body["matchedBy"], "phone");

    let (_, body) =
        get(app.clone(), "/api/check-registration?email=nobody%40example.com").await;
    assert_eq!(
        body,
        json!({ "isRegistered": false, "participant": null, "matchedBy": null })
    );

    let (status, body) = get(app, "/api/check-registration").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "email or phone parameter required");
}

fn registration_form() -> Value {
    json!({
        "nom": "Ilunga",
        "postNom": "Kasongo",
        "prenom": "Grace",
        "sexe": "Féminin",
        "email": " Grace@Example.com ",
        "telephone": "0812345678",
        "diplome": "Master",
        "etablissement": "UNIKIN",
        "anneeObtention": "2019",
        "poste": "Analyste",
        "commentEntendu": ["LinkedIn"],
        "attentes": ["Networking"],
        "accepteTermes": true,
        "accepteUtilisationDonnees": true
    })
}

#[tokio::test]
async fn registration_is_created_and_readable() {
    let app = seeded();
    let (status, body) = post_json(app.clone(), "/api/registrations", registration_form()).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    let id = body["data"]["id"].as_i64().expect("id");

    let (status, body) = get(app.clone(), &format!("/api/registrations/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    let data = &body["data"];
    assert_eq!(data["email"], "grace@example.com");
    assert_eq!(data["phone"], "+243812345678");
    assert_eq!(data["gender"], "F");
    assert_eq!(data["graduationYear"], 2019);
    assert_eq!(data["howHeard"], json!(["LinkedIn"]));

    let (_, body) = get(app.clone(), "/api/registrations").await;
    assert_eq!(body["success"], true);
    assert_eq!(body["count"], 2);

    let (status, body) = post_json(app, "/api/registrations", registration_form()).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn registration_validation_errors() {
    let app = seeded();
    let mut form = registration_form();
    form["email"] = json!("not-an-email");
    form["accepteTermes"] = json!(false);
    let (status, body) = post_json(app.clone(), "/api/registrations", form).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["errors"],
        json!([
            "invalid email format",
            "the terms and conditions must be accepted"
        ])
    );

    let (status, _) = post_json(app.clone(), "/api/registrations", json!([1, 2])).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let request = Request::post("/api/registrations")
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .expect("request");
    let (status, _) = send(app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn payments_for_participant() {
    let app = seeded();
    let (status, body) = get(app.clone(), "/api/participants/1/payments").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    let (status, _) = get(app, "/api/participants/42/payments").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unknown_route_is_json_404() {
    let (status, body) = get(seeded(), "/api/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
}
