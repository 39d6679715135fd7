use actix_cors::Cors;
use actix_files::Files;
use actix_web::{web, App, HttpResponse, HttpServer, Result as ActixResult};
use schoolrec_core::{Error, Location, ModelKind, Preferences, Resolver, SchoolRecord};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::error;

#[derive(Deserialize)]
struct ByNameRequest {
    #[serde(default)]
    school_name: String,
    #[serde(default = "default_model")]
    model: String,
}

#[derive(Deserialize)]
struct ByPreferencesRequest {
    #[serde(default = "default_model")]
    model: String,
    #[serde(default)]
    location_type: Option<String>,
    #[serde(default)]
    city: Option<String>,
    #[serde(default)]
    zipcode: Option<serde_json::Value>,
    #[serde(default)]
    elementary: bool,
    #[serde(default)]
    intermediate: bool,
    #[serde(default)]
    middle: bool,
    #[serde(default)]
    high: bool,
    #[serde(default)]
    school_grade: Option<serde_json::Value>,
}

fn default_model() -> String {
    "knn".to_string()
}

#[derive(Serialize)]
struct ByNameResponse {
    input_school: String,
    model_used: &'static str,
    recommendations: Vec<serde_json::Value>,
}

#[derive(Serialize)]
struct ByPreferencesResponse {
    model_used: &'static str,
    recommendations: Vec<serde_json::Value>,
    total_matches: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'static str>,
}

const NO_MATCH_MESSAGE: &str = "No schools match your criteria. Try adjusting your preferences.";

pub struct RestApi;

impl RestApi {
    pub async fn start(
        resolver: Arc<Resolver>,
        port: u16,
        static_dir: PathBuf,
    ) -> std::io::Result<()> {
        HttpServer::new(move || {
            let cors = Cors::default()
                .allow_any_origin()
                .allow_any_method()
                .allow_any_header()
                .max_age(3600);

            let mut app = App::new()
                .wrap(cors)
                .app_data(web::Data::new(resolver.clone()))
                .route("/api/schools", web::get().to(list_schools))
                .route("/api/cities", web::get().to(list_cities))
                .route("/api/zipcodes", web::get().to(list_zipcodes))
                .route("/api/recommend/by-name", web::post().to(recommend_by_name))
                .route(
                    "/api/recommend/by-preferences",
                    web::post().to(recommend_by_preferences),
                )
                .route("/api/school/{name}", web::get().to(school_details));
            if static_dir.is_dir() {
                app = app.service(Files::new("/", static_dir.clone()).index_file("index.html"));
            }
            app
        })
        .bind(("0.0.0.0", port))?
        .run()
        .await
    }
}

async fn list_schools(resolver: web::Data<Arc<Resolver>>) -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(json!({
        "schools": resolver.store().school_names()
    })))
}

async fn list_cities(resolver: web::Data<Arc<Resolver>>) -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(json!({
        "cities": resolver.store().cities()
    })))
}

async fn list_zipcodes(resolver: web::Data<Arc<Resolver>>) -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(json!({
        "zipcodes": resolver.store().zipcodes()
    })))
}

async fn recommend_by_name(
    resolver: web::Data<Arc<Resolver>>,
    req: web::Json<ByNameRequest>,
) -> ActixResult<HttpResponse> {
    let kind = match req.model.parse::<ModelKind>() {
        Ok(kind) => kind,
        Err(e) => return Ok(error_response(&e)),
    };
    match resolver.by_name(&req.school_name, kind) {
        Ok(rec) => Ok(HttpResponse::Ok().json(ByNameResponse {
            input_school: req.school_name.trim().to_string(),
            model_used: kind.tag(),
            recommendations: record_objects(&rec.schools),
        })),
        Err(e) => Ok(error_response(&e)),
    }
}

async fn recommend_by_preferences(
    resolver: web::Data<Arc<Resolver>>,
    req: web::Json<ByPreferencesRequest>,
) -> ActixResult<HttpResponse> {
    let kind = match req.model.parse::<ModelKind>() {
        Ok(kind) => kind,
        Err(e) => return Ok(error_response(&e)),
    };
    let prefs = match parse_preferences(&req) {
        Ok(prefs) => prefs,
        Err(e) => return Ok(error_response(&e)),
    };
    match resolver.by_preferences(&prefs, kind) {
        Ok(rec) => {
            let message = rec.schools.is_empty().then_some(NO_MATCH_MESSAGE);
            Ok(HttpResponse::Ok().json(ByPreferencesResponse {
                model_used: kind.tag(),
                recommendations: record_objects(&rec.schools),
                total_matches: rec.total_matches.unwrap_or(0),
                message,
            }))
        }
        Err(e) => Ok(error_response(&e)),
    }
}

async fn school_details(
    resolver: web::Data<Arc<Resolver>>,
    path: web::Path<String>,
) -> ActixResult<HttpResponse> {
    let name = path.into_inner();
    match resolver.store().lookup_by_name(&name) {
        Ok(index) => Ok(HttpResponse::Ok().json(record_object(resolver.store().record(index)))),
        Err(e) => Ok(error_response(&e)),
    }
}

fn parse_preferences(req: &ByPreferencesRequest) -> Result<Preferences, Error> {
    let location = match req.location_type.as_deref() {
        Some("city") => req
            .city
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(|c| Location::City(c.to_string())),
        Some("zipcode") => match supplied(&req.zipcode) {
            Some(value) => Some(Location::Zip(numeric(value, "zipcode")? as u32)),
            None => None,
        },
        _ => None,
    };
    let min_grade = match supplied(&req.school_grade) {
        Some(value) => Some(numeric(value, "school_grade")?),
        None => None,
    };
    Ok(Preferences {
        location,
        elementary: req.elementary,
        intermediate: req.intermediate,
        middle: req.middle,
        high: req.high,
        min_grade,
    })
}

/// Absent, null and blank-string fields all mean "no constraint".
fn supplied(value: &Option<serde_json::Value>) -> Option<&serde_json::Value> {
    value.as_ref().filter(|v| match v {
        serde_json::Value::Null => false,
        serde_json::Value::String(s) => !s.trim().is_empty(),
        _ => true,
    })
}

/// Accept a JSON number or a numeric string; clients send both.
fn numeric(value: &serde_json::Value, field: &str) -> Result<f32, Error> {
    match value {
        serde_json::Value::Number(n) => n.as_f64().map(|v| v as f32),
        serde_json::Value::String(s) => s.trim().parse::<f32>().ok(),
        _ => None,
    }
    .ok_or_else(|| Error::InvalidInput(format!("{field} must be numeric")))
}

/// Flat key/value view of a record, extra columns lifted to the top level.
fn record_object(record: &SchoolRecord) -> serde_json::Value {
    let mut value = match serde_json::to_value(record) {
        Ok(value) => value,
        Err(_) => return serde_json::Value::Null,
    };
    if let serde_json::Value::Object(map) = &mut value {
        if let Some(serde_json::Value::Object(extra)) = map.remove("extra") {
            map.extend(extra);
        }
    }
    value
}

fn record_objects(records: &[SchoolRecord]) -> Vec<serde_json::Value> {
    records.iter().map(record_object).collect()
}

fn error_response(err: &Error) -> HttpResponse {
    match err {
        Error::SchoolNotFound(_) => HttpResponse::NotFound().json(json!({
            "error": err.to_string()
        })),
        Error::UnknownModel(_) | Error::InvalidInput(_) => HttpResponse::BadRequest().json(json!({
            "error": err.to_string()
        })),
        _ => {
            error!("request failed: {err}");
            HttpResponse::InternalServerError().json(json!({
                "error": "internal server error"
            }))
        }
    }
}
