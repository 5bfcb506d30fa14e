use httpmock::prelude::*;
use rust_decimal_macros::dec;
use serde_json::json;
use std::time::Duration;

use ludicus_reservas::backend::{BackendClient, BackendError};
use ludicus_reservas::pricing::models::Modality;
use ludicus_reservas::reservations::record::ReservationStatus;
use ludicus_reservas::reservations::session::FormSession;
use uuid::Uuid;

fn client(server: &MockServer) -> BackendClient {
    BackendClient::new(&server.base_url(), Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn test_fetch_catalog() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/api/opciones-reserva");
            then.status(200).json_body(json!({
                "precios_paquete": {"Exclusivo": "3200", "Paquete A": 50},
                "minimos": {"Exclusivo": {"ninos": 30, "adultos": 20}, "Salon 1": {"ninos": "10", "adultos": 5}},
                "paquetes": {"Paquete A": [{"id": "A1", "texto": "Paquete A - Clasico"}]},
                "horarios": {"Salon 1": [{"id": "3:00 PM - 7:00 PM", "texto": "3:00 PM - 7:00 PM"}]}
            }));
        })
        .await;

    let catalog = client(&server).fetch_catalog().await.unwrap();
    mock.assert_async().await;

    assert!(catalog.is_loaded());
    assert_eq!(catalog.base_price_of(&Modality::Exclusive), dec!(3200));
    assert_eq!(catalog.base_price_of(&Modality::from("Paquete A")), dec!(50));
    assert_eq!(catalog.minimums_for("Salon 1").unwrap().children, 10);
    assert_eq!(catalog.packages_for(&Modality::from("Paquete A")).len(), 1);
    assert_eq!(catalog.time_slots_for("Salon 1")[0].label, "3:00 PM - 7:00 PM");
}

#[tokio::test]
async fn test_fetch_reservation() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/reservas/7");
            then.status(200).json_body(json!({
                "codigo": "TR00007",
                "nombre_padres": "Luis Rojas",
                "correo": "-",
                "telefono": "987654321",
                "dni": "-",
                "nombre_cumpleanero": "Mateo",
                "fecha": "21/03/2026",
                "modalidad": "Paquete A",
                "salon": "Salon 1",
                "paquete": "A1",
                "horario": "3:00 PM - 7:00 PM",
                "ninos": 12,
                "adultos": 6,
                "estado": "Abonado",
                "accesorios": "Ninguno",
                "comentarios": "Ninguno",
                "adicionales": "[{\"id\": 3, \"nombre\": \"Piñata\", \"precio\": \"45.5\", \"cantidad\": 1}]",
                "total": 675.5,
                "a_cuenta": 300,
                "saldo": 375.5
            }));
        })
        .await;

    let record = client(&server).fetch_reservation(7).await.unwrap();
    assert_eq!(record.code, "TR00007");
    assert_eq!(record.status, ReservationStatus::Paid);
    assert_eq!(record.add_ons.len(), 1);
    assert_eq!(record.add_ons[0].id, "3");
    assert_eq!(record.add_ons[0].unit_price, dec!(45.5));
    assert_eq!(record.balance, dec!(375.5));

    let details = record.details();
    assert_eq!(details.email, "");
    assert_eq!(details.accessories, "");
    assert_eq!(
        details.celebration_date,
        chrono::NaiveDate::from_ymd_opt(2026, 3, 21)
    );
}

#[tokio::test]
async fn test_error_body_is_not_found() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/reservas/99");
            then.status(200)
                .json_body(json!({"error": "Reserva no encontrada"}));
        })
        .await;

    let err = client(&server).fetch_reservation(99).await.unwrap_err();
    assert!(err.is_not_found());
    assert!(matches!(err, BackendError::Api { status: 404, .. }));
}

#[tokio::test]
async fn test_server_error_status() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/opciones-reserva");
            then.status(500).body("Internal Server Error");
        })
        .await;

    let err = client(&server).fetch_catalog().await.unwrap_err();
    assert!(matches!(err, BackendError::Api { status: 500, .. }));
}

#[tokio::test]
async fn test_next_code() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/proximo-codigo/2");
            then.status(200).json_body(json!({"codigo": "TR00042"}));
        })
        .await;

    assert_eq!(client(&server).next_code(2).await.unwrap(), "TR00042");
}

#[tokio::test]
async fn test_submit_follows_form_action() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/reservas/editar/7")
                .body_contains("nombre_padres=Luis+Rojas")
                .body_contains("total=0.00");
            then.status(302).header("Location", "/reservas");
        })
        .await;

    let mut session = FormSession::new(Uuid::new_v4(), None, "TR00001");
    session.begin_edit(7);
    let mut details = session.details().clone();
    details.parent_name = "Luis Rojas".to_string();
    session.update_details(details);

    let outcome = client(&server)
        .submit_reservation(&session.submission())
        .await
        .unwrap();
    mock.assert_async().await;
    assert_eq!(outcome.status, 302);
    assert_eq!(outcome.redirect_to.as_deref(), Some("/reservas"));
}

#[tokio::test]
async fn test_submit_rejected() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/reservas/nueva");
            then.status(400).body("Datos invalidos");
        })
        .await;

    let session = FormSession::new(Uuid::new_v4(), None, "TR00001");
    let err = client(&server)
        .submit_reservation(&session.submission())
        .await
        .unwrap_err();
    assert!(matches!(err, BackendError::Api { status: 400, .. }));
}
