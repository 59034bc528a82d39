// Parameter sets for the platform operations exposed by the gateway

use super::fields::{Params, RequestFields};
use crate::error::ApiError;

/// POST /rest/2.0/ocr/v1/general_basic
pub fn ocr_general_basic(fields: &RequestFields) -> Result<Params, ApiError> {
    let image = fields.require("image")?;

    Ok(vec![
        ("image", image),
        ("language_type", fields.get_or("language_type", "CHN_ENG")),
        ("detect_direction", fields.get_or("detect_direction", "false")),
        ("detect_language", fields.get_or("detect_language", "false")),
        ("vertexes_location", fields.get_or("vertexes_location", "false")),
        ("probability", fields.get_or("probability", "false")),
    ])
}

/// GET /rest/2.0/tts/v1
pub fn tts(fields: &RequestFields) -> Result<Params, ApiError> {
    let tex = fields.require("tex")?;

    Ok(vec![
        ("tex", tex),
        ("lan", fields.get_or("lan", "zh")),
        ("spd", fields.get_or("spd", "5")),
        ("pit", fields.get_or("pit", "5")),
        ("vol", fields.get_or("vol", "5")),
        ("per", fields.get_or("per", "0")),
        ("aue", fields.get_or("aue", "3")),
    ])
}

/// POST /rpc/2.0/nlp/v1/sentiment_classify
pub fn sentiment_classify(fields: &RequestFields) -> Result<Params, ApiError> {
    Ok(vec![("text", fields.require("text")?)])
}

/// POST /rest/2.0/image-classify/v1/advanced_general
pub fn advanced_general(fields: &RequestFields) -> Result<Params, ApiError> {
    let image = fields.require("image")?;

    Ok(vec![
        ("image", image),
        ("baike_num", fields.get_or("baike_num", "0")),
    ])
}
