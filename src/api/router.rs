//! API router.
//!
//! Returns a composable `Router` with every route under `/api/`.
//!
//! Layer order (outermost → innermost):
//! 1. CORS → 2. Audit logger → handler

use axum::http::{header, Method};
use axum::routing::{get, post, put};
use axum::Router;
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::api::endpoints;
use crate::api::middleware;
use crate::api::types::ApiContext;

/// Build the API router from a constructed `ApiContext`.
///
/// Endpoint handlers use `State<ApiContext>` (provided via `with_state`).
/// NOTE: Path params use `:param` syntax (matchit 0.7 / axum 0.7).
pub fn build_router(ctx: ApiContext) -> Router {
    let cors = cors_layer(&ctx);

    let api = Router::new()
        .route("/health", get(endpoints::health::check))
        // Staff
        .route(
            "/usuarios",
            post(endpoints::usuarios::create).get(endpoints::usuarios::list),
        )
        .route("/usuarios/:id", get(endpoints::usuarios::detail))
        .route("/usuarios/:id/burnout", get(endpoints::burnout::by_usuario))
        // Patients
        .route(
            "/pacientes",
            post(endpoints::pacientes::create).get(endpoints::pacientes::list),
        )
        .route("/pacientes/:rut", get(endpoints::pacientes::detail))
        .route("/pacientes/:rut/cama", put(endpoints::pacientes::update_cama))
        .route("/pacientes/:rut/apache2", get(endpoints::apache2::by_paciente))
        .route("/pacientes/:rut/nas", get(endpoints::nas::by_paciente))
        .route(
            "/pacientes/:rut/kinesiologia",
            get(endpoints::kinesiologia::by_paciente),
        )
        // Stored evaluations
        .route("/apache2", post(endpoints::apache2::create))
        .route("/apache2/:id", get(endpoints::apache2::detail))
        .route("/nas", post(endpoints::nas::create))
        .route("/nas/:id", get(endpoints::nas::detail))
        .route("/kinesiologia", post(endpoints::kinesiologia::create))
        .route("/kinesiologia/:id", get(endpoints::kinesiologia::detail))
        .route("/burnout", post(endpoints::burnout::create))
        .route("/burnout/:id", get(endpoints::burnout::detail))
        // Previews
        .route("/calcular/apache2", post(endpoints::calcular::apache2))
        .route("/calcular/nas", post(endpoints::calcular::nas))
        .route(
            "/calcular/kinesiologia",
            post(endpoints::calcular::kinesiologia),
        )
        .route("/calcular/burnout", post(endpoints::calcular::burnout))
        .with_state(ctx)
        .layer(axum::middleware::from_fn(middleware::audit::log_access))
        .layer(cors);

    Router::new().nest("/api", api)
}

/// A configured origin is the only one allowed; without one, any origin
/// may call (the local webview wrapper has no stable origin).
fn cors_layer(ctx: &ApiContext) -> CorsLayer {
    let origin = match &ctx.cors_origin {
        Some(o) => AllowOrigin::exact(o.clone()),
        None => AllowOrigin::any(),
    };
    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT])
        .allow_headers([header::CONTENT_TYPE])
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::api::types::test_support::test_context;
    use crate::scoring::burnout::NUM_PREGUNTAS;

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(v) => {
                builder = builder.header("content-type", "application/json");
                Body::from(v.to_string())
            }
            None => Body::empty(),
        };
        let response = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    /// Router with one registered user and one admitted patient.
    async fn seeded() -> (Router, tempfile::TempDir, String) {
        let (ctx, dir) = test_context();
        let app = build_router(ctx);

        let (status, usuario) = send(
            &app,
            "POST",
            "/api/usuarios",
            Some(json!({
                "nombre": "Dra. Paz Soto",
                "email": "paz.soto@uti.cl",
                "estamento": "medicina",
                "password": "turno-largo-24"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert!(usuario.get("password").is_none());

        let (status, _) = send(
            &app,
            "POST",
            "/api/pacientes",
            Some(json!({
                "rut": "12.345.678-5",
                "nombre": "Juan Pérez",
                "cama": "UTI-1",
                "fechaIngreso": "2024-03-01"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let id = usuario["id"].as_str().unwrap().to_string();
        (app, dir, id)
    }

    /// Merge the fields of `extra` into the object `base`.
    fn with(mut base: Value, extra: Value) -> Value {
        if let (Some(b), Value::Object(e)) = (base.as_object_mut(), extra) {
            b.extend(e);
        }
        base
    }

    fn mediciones() -> Value {
        json!({
            "temperatura": 37.0,
            "presionArterialMedia": 90.0,
            "frecuenciaCardiaca": 80.0,
            "frecuenciaRespiratoria": 16.0,
            "oxigenacion": 95.0,
            "phArterial": 7.4,
            "sodio": 140.0,
            "potasio": 4.0,
            "creatinina": 1.0,
            "hematocrito": 40.0,
            "leucocitos": 8.0,
            "glasgow": 15.0,
            "edad": 30.0,
            "enfermedadCronica": false
        })
    }

    #[tokio::test]
    async fn health_reports_schema_version() {
        let (ctx, _dir) = test_context();
        let app = build_router(ctx);
        let (status, json) = send(&app, "GET", "/api/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "ok");
        assert_eq!(json["schemaVersion"], 1);
    }

    #[tokio::test]
    async fn unknown_route_returns_404() {
        let (ctx, _dir) = test_context();
        let app = build_router(ctx);
        let (status, _) = send(&app, "GET", "/api/nonexistent", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn apache2_is_stored_and_listed_for_patient() {
        let (app, _dir, usuario_id) = seeded().await;
        let (status, eval) = send(
            &app,
            "POST",
            "/api/apache2",
            Some(with(
                mediciones(),
                json!({"usuarioId": usuario_id, "pacienteRut": "12345678-5"}),
            )),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(eval["pacienteRut"], "12345678-5");
        assert_eq!(eval["mediciones"]["sodio"], 140.0);
        assert_eq!(eval["resultado"]["puntajeTotal"], 0);
        assert_eq!(eval["resultado"]["nivelRiesgo"], "bajo");

        let id = eval["id"].as_str().unwrap();
        let (status, fetched) = send(&app, "GET", &format!("/api/apache2/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched, eval);

        let (status, list) = send(&app, "GET", "/api/pacientes/12.345.678-5/apache2", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(list.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn evaluations_without_patient_are_stored() {
        let (app, _dir, usuario_id) = seeded().await;
        let (status, eval) = send(
            &app,
            "POST",
            "/api/apache2",
            Some(with(mediciones(), json!({"usuarioId": usuario_id}))),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert!(eval["pacienteRut"].is_null());

        let (status, cat) = send(
            &app,
            "POST",
            "/api/kinesiologia",
            Some(json!({
                "usuarioId": usuario_id,
                "patronRespiratorio": 1,
                "asistenciaVentilatoria": 1,
                "sasGlasgow": 1,
                "tosSecreciones": 1,
                "asistencia": 1
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert!(cat["pacienteRut"].is_null());
        assert_eq!(cat["resultado"]["complejidad"], "Baja");

        let (_, list) = send(&app, "GET", "/api/pacientes/12345678-5/apache2", None).await;
        assert!(list.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn supplied_fecha_evaluacion_is_kept() {
        let (app, _dir, usuario_id) = seeded().await;
        let (status, eval) = send(
            &app,
            "POST",
            "/api/apache2",
            Some(with(
                mediciones(),
                json!({
                    "usuarioId": usuario_id,
                    "pacienteRut": "12345678-5",
                    "fechaEvaluacion": "2024-01-02T08:00:00"
                }),
            )),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(eval["fechaEvaluacion"], "2024-01-02T08:00:00");

        let id = eval["id"].as_str().unwrap();
        let (_, fetched) = send(&app, "GET", &format!("/api/apache2/{id}"), None).await;
        assert_eq!(fetched["fechaEvaluacion"], "2024-01-02T08:00:00");

        let (status, _) = send(
            &app,
            "POST",
            "/api/apache2",
            Some(with(
                mediciones(),
                json!({"usuarioId": usuario_id, "fechaEvaluacion": "ayer"}),
            )),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn nas_observaciones_are_stored() {
        let (app, _dir, usuario_id) = seeded().await;
        let (status, eval) = send(
            &app,
            "POST",
            "/api/nas",
            Some(json!({
                "usuarioId": usuario_id,
                "pacienteRut": "12345678-5",
                "selecciones": {"item_1b": true, "item_9": true},
                "observaciones": "turno noche"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(eval["observaciones"], "turno noche");
        assert_eq!(eval["resultado"]["puntuacionTotal"], 13.5);

        let (_, list) = send(&app, "GET", "/api/pacientes/12345678-5/nas", None).await;
        assert_eq!(list[0]["observaciones"], "turno noche");
    }

    #[tokio::test]
    async fn missing_measurement_is_400_naming_field() {
        let (app, _dir, usuario_id) = seeded().await;
        let mut m = mediciones();
        m.as_object_mut().unwrap().remove("sodio");
        let (status, json) = send(
            &app,
            "POST",
            "/api/apache2",
            Some(with(m, json!({"usuarioId": usuario_id, "pacienteRut": "12345678-5"}))),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(json["error"]["field"], "sodio");
    }

    #[tokio::test]
    async fn unknown_user_or_patient_is_404() {
        let (app, _dir, usuario_id) = seeded().await;
        let (status, _) = send(
            &app,
            "POST",
            "/api/nas",
            Some(json!({
                "usuarioId": uuid::Uuid::new_v4(),
                "pacienteRut": "12345678-5",
                "selecciones": {}
            })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(
            &app,
            "POST",
            "/api/nas",
            Some(json!({
                "usuarioId": usuario_id,
                "pacienteRut": "11.111.111-1",
                "selecciones": {}
            })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn nas_group_conflict_is_rejected() {
        let (app, _dir, usuario_id) = seeded().await;
        let (status, json) = send(
            &app,
            "POST",
            "/api/nas",
            Some(json!({
                "usuarioId": usuario_id,
                "pacienteRut": "12345678-5",
                "selecciones": {"item_1a": true, "item_1b": true}
            })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["field"], "grupo 1");

        let (_, list) = send(&app, "GET", "/api/pacientes/12345678-5/nas", None).await;
        assert!(list.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn kinesiologia_and_burnout_round_trip() {
        let (app, _dir, usuario_id) = seeded().await;
        let (status, cat) = send(
            &app,
            "POST",
            "/api/kinesiologia",
            Some(json!({
                "usuarioId": usuario_id,
                "pacienteRut": "12345678-5",
                "patronRespiratorio": 5,
                "asistenciaVentilatoria": 5,
                "sasGlasgow": 5,
                "tosSecreciones": 5,
                "asistencia": 5
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(cat["resultado"]["complejidad"], "Alta");
        assert_eq!(cat["resultado"]["cargaAsistencial"], "Alta carga asistencial");

        let (status, encuesta) = send(
            &app,
            "POST",
            "/api/burnout",
            Some(json!({"usuarioId": usuario_id, "respuestas": vec![0; NUM_PREGUNTAS]})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(encuesta["resultado"]["agotamientoEmocional"]["nivel"], "bajo");

        let (status, list) =
            send(&app, "GET", &format!("/api/usuarios/{usuario_id}/burnout"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(list.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn preview_does_not_persist() {
        let (app, _dir, _) = seeded().await;
        let (status, json) = send(
            &app,
            "POST",
            "/api/calcular/nas",
            Some(json!({"selecciones": {"item_1b": true, "item_9": true}})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["puntuacionTotal"], 13.5);
        assert_eq!(json["carga"], "baja");

        let (_, list) = send(&app, "GET", "/api/pacientes/12345678-5/nas", None).await;
        assert!(list.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn burnout_preview_names_bad_question() {
        let (ctx, _dir) = test_context();
        let app = build_router(ctx);
        let mut respuestas = vec![1; NUM_PREGUNTAS];
        respuestas[21] = 9;
        let (status, json) = send(
            &app,
            "POST",
            "/api/calcular/burnout",
            Some(json!({"respuestas": respuestas})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["field"], "pregunta_22");
    }

    #[tokio::test]
    async fn occupied_bed_is_409() {
        let (app, _dir, _) = seeded().await;
        let (status, _) = send(
            &app,
            "POST",
            "/api/pacientes",
            Some(json!({
                "rut": "11.111.111-1",
                "nombre": "Ana Díaz",
                "fechaIngreso": "2024-03-02"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, json) = send(
            &app,
            "PUT",
            "/api/pacientes/11111111-1/cama",
            Some(json!({"cama": "UTI-1"})),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(json["error"]["code"], "CONFLICT");
    }

    #[tokio::test]
    async fn duplicate_email_is_409() {
        let (app, _dir, _) = seeded().await;
        let (status, _) = send(
            &app,
            "POST",
            "/api/usuarios",
            Some(json!({
                "nombre": "Otra Persona",
                "email": "PAZ.SOTO@uti.cl",
                "estamento": "enfermeria",
                "password": "otra-clave-larga"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn malformed_json_is_structured_400() {
        let (ctx, _dir) = test_context();
        let app = build_router(ctx);
        let request = Request::builder()
            .method("POST")
            .uri("/api/calcular/apache2")
            .header("content-type", "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["error"]["code"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn invalid_id_is_400() {
        let (ctx, _dir) = test_context();
        let app = build_router(ctx);
        let (status, _) = send(&app, "GET", "/api/burnout/not-a-uuid", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn cors_preflight_allows_configured_origin() {
        let (mut ctx, _dir) = test_context();
        ctx.cors_origin = Some("https://uti.example.cl".parse().unwrap());
        let app = build_router(ctx);
        let request = Request::builder()
            .method("OPTIONS")
            .uri("/api/pacientes")
            .header("origin", "https://uti.example.cl")
            .header("access-control-request-method", "POST")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(
            response.headers().get("access-control-allow-origin").unwrap(),
            "https://uti.example.cl"
        );
    }
}
