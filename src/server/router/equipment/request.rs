use serde::Deserialize;
use serde_json::Value as JsonValue;
use ulid::Ulid;

#[derive(Deserialize)]
pub(in crate::server::router) struct EquipmentRequest {
    pub equipment_name: String,
    pub is_active: Option<bool>,
    #[serde(default)]
    pub equipment_details: Vec<EquipmentDetailRequest>,
    #[serde(default)]
    pub parameters: Vec<ParameterRequest>,
}

#[derive(Deserialize)]
pub(in crate::server::router) struct EquipmentDetailRequest {
    pub equipment_num: String,
    pub make: String,
    pub model: String,
    pub is_active: Option<bool>,
}

#[derive(Deserialize)]
pub(in crate::server::router) struct ParameterRequest {
    pub parameter_name: String,
    pub is_active: Option<bool>,
    #[serde(default)]
    pub parameter_values: Vec<ParameterValueRequest>,
    pub format: Option<JsonValue>,
}

#[derive(Deserialize)]
pub(in crate::server::router) struct ParameterValueRequest {
    pub content: JsonValue,
}

#[derive(Deserialize)]
pub(super) struct PutEquipmentRequest {
    pub equipment_name: Option<String>,
    pub is_active: Option<bool>,
    #[serde(default)]
    pub equipment_details: Vec<EquipmentDetailRequest>,
    #[serde(default)]
    pub parameters: Vec<ParameterAppendRequest>,
}

#[derive(Deserialize)]
pub(super) struct ParameterAppendRequest {
    pub id: Option<Ulid>,
    #[serde(default)]
    pub parameter_values: Vec<ParameterValueRequest>,
}
