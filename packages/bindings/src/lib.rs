use napi::Result as NapiResult;
use napi_derive::napi;
use serde::de::DeserializeOwned;
use serde::Serialize;

use realty_calc_core::store::{DealStore, DealType, MemoryDealStore, SavedDeal};
use realty_calc_core::{CalculatorConfig, RealtyCalcResult};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

/// Deserialize `input_json`, run `f`, serialize its output.
fn call<T, R>(input_json: &str, f: impl FnOnce(&T) -> RealtyCalcResult<R>) -> NapiResult<String>
where
    T: DeserializeOwned,
    R: Serialize,
{
    let input: T = serde_json::from_str(input_json).map_err(to_napi_error)?;
    let output = f(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

/// Defaults unless a TOML override is supplied.
fn config_from(config_toml: Option<String>) -> NapiResult<CalculatorConfig> {
    match config_toml {
        Some(s) => CalculatorConfig::from_toml_str(&s).map_err(to_napi_error),
        None => Ok(CalculatorConfig::default()),
    }
}

// ---------------------------------------------------------------------------
// Mortgage
// ---------------------------------------------------------------------------

#[napi]
pub fn calculate_payment(input_json: String) -> NapiResult<String> {
    call(&input_json, realty_calc_core::mortgage::payment::calculate_payment)
}

#[napi]
pub fn amortization_schedule(input_json: String) -> NapiResult<String> {
    call(&input_json, realty_calc_core::mortgage::amortization::build_schedule)
}

#[napi]
pub fn balloon_payment(input_json: String) -> NapiResult<String> {
    call(&input_json, realty_calc_core::mortgage::balloon::calculate_balloon)
}

// ---------------------------------------------------------------------------
// Rental
// ---------------------------------------------------------------------------

#[napi]
pub fn cash_flow(input_json: String) -> NapiResult<String> {
    call(&input_json, realty_calc_core::rental::cash_flow::analyze_cash_flow)
}

#[napi]
pub fn deal_criteria(input_json: String, config_toml: Option<String>) -> NapiResult<String> {
    let config = config_from(config_toml)?;
    call(&input_json, |m: &realty_calc_core::rental::criteria::CriteriaMetrics| {
        realty_calc_core::rental::criteria::evaluate_criteria(m, &config.criteria)
    })
}

#[napi]
pub fn rental_strategies(input_json: String) -> NapiResult<String> {
    call(
        &input_json,
        realty_calc_core::rental::strategy::compare_rental_strategies,
    )
}

// ---------------------------------------------------------------------------
// Wholesale
// ---------------------------------------------------------------------------

/// `arv` is a decimal string; returns `{ exit_percentage, preferred_exit_price }`.
#[napi]
pub fn exit_percentage(arv: String, config_toml: Option<String>) -> NapiResult<String> {
    let config = config_from(config_toml)?;
    let arv: rust_decimal::Decimal = arv.trim().parse().map_err(to_napi_error)?;
    let tiers = &config.exit_tiers;
    let output = serde_json::json!({
        "exit_percentage": realty_calc_core::wholesale::exit::exit_percentage(arv, tiers),
        "preferred_exit_price": realty_calc_core::wholesale::exit::preferred_exit_price(arv, tiers),
    });
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn wholesale_analysis(input_json: String, config_toml: Option<String>) -> NapiResult<String> {
    let config = config_from(config_toml)?;
    call(&input_json, |i: &realty_calc_core::wholesale::analysis::WholesaleInput| {
        realty_calc_core::wholesale::analysis::wholesale_analysis(i, &config)
    })
}

// ---------------------------------------------------------------------------
// Creative financing, underwriting, tax, comparison
// ---------------------------------------------------------------------------

#[napi]
pub fn creative_financing(input_json: String, config_toml: Option<String>) -> NapiResult<String> {
    let config = config_from(config_toml)?;
    call(&input_json, |i: &realty_calc_core::creative::CreativeFinancingInput| {
        realty_calc_core::creative::analyze_creative_deal(i, &config)
    })
}

#[napi]
pub fn underwrite_property(input_json: String) -> NapiResult<String> {
    call(&input_json, realty_calc_core::underwriting::underwrite_property)
}

#[napi]
pub fn estimate_tax(input_json: String) -> NapiResult<String> {
    call(&input_json, realty_calc_core::tax::estimate_tax)
}

#[napi]
pub fn compare_deals(input_json: String) -> NapiResult<String> {
    call(&input_json, realty_calc_core::comparison::compare_deals)
}

// ---------------------------------------------------------------------------
// Saved deals
// ---------------------------------------------------------------------------

/// In-memory deal list for a front end that persists it itself.
#[napi]
pub struct DealBook {
    store: MemoryDealStore,
}

#[napi]
impl DealBook {
    #[napi(constructor)]
    pub fn new() -> Self {
        Self {
            store: MemoryDealStore::default(),
        }
    }

    /// Save a deal and return its id. `deal_type` is the kebab-case name,
    /// e.g. `"creative-financing"`.
    #[napi]
    pub fn save(
        &mut self,
        deal_type: String,
        name: String,
        inputs_json: String,
        results_json: String,
    ) -> NapiResult<String> {
        let deal_type: DealType =
            serde_json::from_value(serde_json::Value::String(deal_type)).map_err(to_napi_error)?;
        let inputs = serde_json::from_str(&inputs_json).map_err(to_napi_error)?;
        let results = serde_json::from_str(&results_json).map_err(to_napi_error)?;
        let deal = SavedDeal::new(deal_type, name, inputs, results);
        let id = deal.id.to_string();
        self.store.save(deal).map_err(to_napi_error)?;
        Ok(id)
    }

    #[napi]
    pub fn load(&self, id: String) -> NapiResult<String> {
        let id: uuid::Uuid = id.parse().map_err(to_napi_error)?;
        let deal = self.store.load(id).map_err(to_napi_error)?;
        serde_json::to_string(&deal).map_err(to_napi_error)
    }

    /// Every saved deal, newest first.
    #[napi]
    pub fn list(&self) -> NapiResult<String> {
        let deals = self.store.list().map_err(to_napi_error)?;
        serde_json::to_string(&deals).map_err(to_napi_error)
    }

    #[napi]
    pub fn delete(&mut self, id: String) -> NapiResult<()> {
        let id: uuid::Uuid = id.parse().map_err(to_napi_error)?;
        self.store.delete(id).map_err(to_napi_error)
    }
}

impl Default for DealBook {
    fn default() -> Self {
        Self::new()
    }
}
