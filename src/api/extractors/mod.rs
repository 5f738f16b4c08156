pub mod auth;
pub mod validated_json;
pub mod id_path;
