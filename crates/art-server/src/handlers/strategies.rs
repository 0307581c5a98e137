use actix_web::HttpResponse;
use art_core::ModificationStrategy;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct StrategyInfo {
    pub number: u8,
    pub tag: &'static str,
    pub name: String,
    pub description: &'static str,
}

#[derive(Debug, Serialize)]
pub struct StrategyListResponse {
    pub strategies: Vec<StrategyInfo>,
}

/// The fixed strategy catalogue, in selector order.
pub async fn list() -> HttpResponse {
    let strategies = ModificationStrategy::ALL
        .iter()
        .map(|s| StrategyInfo {
            number: s.number(),
            tag: s.as_str(),
            name: s.display_name(),
            description: s.description(),
        })
        .collect();

    HttpResponse::Ok().json(StrategyListResponse { strategies })
}
