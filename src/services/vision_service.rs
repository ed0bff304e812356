//! Servicio de extracción de atributos por IA
//!
//! Este módulo envía una imagen al endpoint `generateContent` del modelo
//! multimodal y devuelve el borrador de atributos del coche. El modelo debe
//! responder un objeto JSON plano; la respuesta cruda nunca llega al cliente,
//! sólo al log del servidor.

use base64::{engine::general_purpose::STANDARD, Engine};
use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::config::environment::EnvironmentConfig;
use crate::dto::car_dto::ExtractedCarDetails;
use crate::utils::errors::{AppError, AppResult};

lazy_static! {
    // Marcadores ``` / ```json alrededor del JSON devuelto por el modelo
    static ref FENCE_RE: Regex = Regex::new(r"```(?:json)?\n?").unwrap();
}

/// Campos que el modelo está obligado a devolver (`seats` es opcional)
const REQUIRED_FIELDS: [&str; 11] = [
    "make",
    "model",
    "year",
    "color",
    "bodyType",
    "price",
    "mileage",
    "fuelType",
    "transmission",
    "description",
    "confidence",
];

const EXTRACTION_PROMPT: &str = r#"Analyze this car image and extract the following information:
1. Make (manufacturer)
2. Model
3. Year (approximately)
4. Color
5. Body type (SUV, Sedan, Hatchback, etc.)
6. Mileage (your best guess)
7. Fuel type (your best guess)
8. Transmission type (your best guess)
9. Price (your best guess)
10. Short description as to be added to a car listing

Format your response as a clean JSON object with these fields:
{
  "make": "",
  "model": "",
  "year": "",
  "color": "",
  "price": "",
  "mileage": "",
  "bodyType": "",
  "fuelType": "",
  "transmission": "",
  "description": "",
  "seats": "",
  "confidence": 0.0
}

For confidence, provide a value between 0 and 1 representing how confident you are in your overall identification.
Only respond with the JSON object, no additional text."#;

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

pub struct VisionService {
    api_key: String,
    model: String,
    client: reqwest::Client,
}

impl VisionService {
    pub fn new(config: &EnvironmentConfig, client: reqwest::Client) -> Self {
        Self {
            api_key: config.gemini_api_key.clone(),
            model: config.gemini_model.clone(),
            client,
        }
    }

    /// Enviar la imagen al modelo y devolver el borrador de atributos.
    /// Un solo intento; los fallos suben como `ExternalService`.
    pub async fn extract_car_details(
        &self,
        image_bytes: &[u8],
        mime_type: &str,
    ) -> AppResult<ExtractedCarDetails> {
        log::info!("🔍 Extracting car details from image ({} bytes)", image_bytes.len());

        let url = format!(
            "https://generativelanguage.googleapis.com/v1beta/models/{}:generateContent?key={}",
            self.model, self.api_key
        );

        let body = json!({
            "contents": [{
                "parts": [
                    {
                        "inline_data": {
                            "mime_type": mime_type,
                            "data": STANDARD.encode(image_bytes),
                        }
                    },
                    { "text": EXTRACTION_PROMPT },
                ]
            }]
        });

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                log::error!("❌ AI request failed: {}", e);
                AppError::ExternalService("Failed to reach AI service".to_string())
            })?;

        let status = response.status();
        log::info!("📡 AI response status: {}", status);

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            log::error!("❌ AI request failed with status {}: {}", status, error_text);
            return Err(AppError::ExternalService(format!(
                "AI request failed: {}",
                status
            )));
        }

        let payload: GenerateContentResponse = response.json().await.map_err(|e| {
            log::error!("❌ Failed to decode AI response body: {}", e);
            AppError::ExternalService("Invalid AI response".to_string())
        })?;

        let raw_text = payload
            .candidates
            .first()
            .and_then(|c| c.content.parts.first())
            .and_then(|p| p.text.clone())
            .ok_or_else(|| {
                log::error!("❌ AI response contained no candidates");
                AppError::ExternalService("AI response contained no text".to_string())
            })?;

        parse_model_response(&raw_text)
    }
}

/// Limpiar y validar el texto devuelto por el modelo.
///
/// Quita los marcadores de código, parsea el JSON y comprueba que los once
/// campos obligatorios estén presentes antes de construir el borrador.
pub fn parse_model_response(raw: &str) -> AppResult<ExtractedCarDetails> {
    let cleaned = FENCE_RE.replace_all(raw, "");
    let cleaned = cleaned.trim();

    let value: Value = serde_json::from_str(cleaned).map_err(|e| {
        log::error!("❌ AI response is not valid JSON: {}", e);
        log::error!("📄 Raw AI response: {}", raw);
        AppError::ExternalService("Failed to parse AI response".to_string())
    })?;

    let missing: Vec<&str> = REQUIRED_FIELDS
        .iter()
        .filter(|field| value.get(**field).is_none())
        .copied()
        .collect();

    if !missing.is_empty() {
        log::error!("📄 Raw AI response: {}", raw);
        return Err(AppError::ExternalService(format!(
            "AI response missing required fields: {}",
            missing.join(", ")
        )));
    }

    let confidence = value["confidence"].as_f64().ok_or_else(|| {
        log::error!("📄 Raw AI response: {}", raw);
        AppError::ExternalService("Failed to parse AI response".to_string())
    })?;

    let details = ExtractedCarDetails {
        make: coerce_string(&value["make"]).unwrap_or_default(),
        model: coerce_string(&value["model"]).unwrap_or_default(),
        year: coerce_string(&value["year"]).unwrap_or_default(),
        color: coerce_string(&value["color"]).unwrap_or_default(),
        price: coerce_string(&value["price"]).unwrap_or_default(),
        mileage: coerce_string(&value["mileage"]).unwrap_or_default(),
        body_type: coerce_string(&value["bodyType"]).unwrap_or_default(),
        fuel_type: coerce_string(&value["fuelType"]).unwrap_or_default(),
        transmission: coerce_string(&value["transmission"]).unwrap_or_default(),
        description: coerce_string(&value["description"]).unwrap_or_default(),
        seats: value.get("seats").and_then(coerce_string),
        confidence,
    };

    log::info!(
        "✅ Extracted details: {} {} ({}), confidence {}",
        details.make,
        details.model,
        details.year,
        details.confidence
    );

    Ok(details)
}

/// El contrato pide strings, pero los modelos devuelven números con
/// frecuencia; se aceptan ambos
fn coerce_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_payload() -> serde_json::Value {
        json!({
            "make": "Toyota",
            "model": "Corolla",
            "year": "2021",
            "color": "Blue",
            "price": "18500",
            "mileage": "32000",
            "bodyType": "Sedan",
            "fuelType": "Petrol",
            "transmission": "Automatic",
            "description": "Well kept compact sedan",
            "seats": "5",
            "confidence": 0.85
        })
    }

    #[test]
    fn test_parses_fenced_json() {
        let raw = format!("```json\n{}\n```", full_payload());
        let details = parse_model_response(&raw).unwrap();
        assert_eq!(details.make, "Toyota");
        assert_eq!(details.body_type, "Sedan");
        assert_eq!(details.confidence, 0.85);
    }

    #[test]
    fn test_parses_plain_json() {
        let raw = full_payload().to_string();
        let details = parse_model_response(&raw).unwrap();
        assert_eq!(details.model, "Corolla");
        assert_eq!(details.seats, Some("5".to_string()));
    }

    #[test]
    fn test_missing_confidence_is_reported_by_name() {
        let mut payload = full_payload();
        payload.as_object_mut().unwrap().remove("confidence");

        let error = parse_model_response(&payload.to_string()).unwrap_err();
        match error {
            AppError::ExternalService(msg) => {
                assert!(msg.contains("missing required fields"));
                assert!(msg.contains("confidence"));
            }
            other => panic!("expected ExternalService, got {:?}", other),
        }
    }

    #[test]
    fn test_all_missing_fields_are_listed() {
        let mut payload = full_payload();
        {
            let object = payload.as_object_mut().unwrap();
            object.remove("make");
            object.remove("fuelType");
        }

        let error = parse_model_response(&payload.to_string()).unwrap_err();
        match error {
            AppError::ExternalService(msg) => {
                assert!(msg.contains("make"));
                assert!(msg.contains("fuelType"));
            }
            other => panic!("expected ExternalService, got {:?}", other),
        }
    }

    #[test]
    fn test_garbage_response_is_a_generic_parse_error() {
        let error = parse_model_response("I could not identify the car, sorry!").unwrap_err();
        match error {
            AppError::ExternalService(msg) => {
                assert_eq!(msg, "Failed to parse AI response");
            }
            other => panic!("expected ExternalService, got {:?}", other),
        }
    }

    #[test]
    fn test_numeric_fields_are_coerced_to_strings() {
        let mut payload = full_payload();
        {
            let object = payload.as_object_mut().unwrap();
            object.insert("year".to_string(), json!(2021));
            object.insert("price".to_string(), json!(18500));
        }

        let details = parse_model_response(&payload.to_string()).unwrap();
        assert_eq!(details.year, "2021");
        assert_eq!(details.price, "18500");
    }

    #[test]
    fn test_seats_is_optional() {
        let mut payload = full_payload();
        payload.as_object_mut().unwrap().remove("seats");

        let details = parse_model_response(&payload.to_string()).unwrap();
        assert_eq!(details.seats, None);
    }
}
