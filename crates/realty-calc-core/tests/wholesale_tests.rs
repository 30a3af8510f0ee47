use pretty_assertions::assert_eq;
use realty_calc_core::config::{CalculatorConfig, ExitTiers};
use realty_calc_core::wholesale::analysis::{wholesale_analysis, WholesaleInput};
use realty_calc_core::wholesale::exit::exit_percentage;
use realty_calc_core::wholesale::rehab::{RehabCondition, RehabItem, RehabSource};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

#[test]
fn test_exit_percentage_boundaries() {
    let tiers = ExitTiers::default();
    assert_eq!(exit_percentage(dec!(149999), &tiers), dec!(0.60));
    assert_eq!(exit_percentage(dec!(150000), &tiers), dec!(0.65));
    assert_eq!(exit_percentage(dec!(400000), &tiers), dec!(0.80));
}

#[test]
fn test_scenario_arv_250k() {
    let input = WholesaleInput {
        arv: dec!(250000),
        rehab_cost: dec!(30000),
        ..WholesaleInput::default()
    };
    let out = wholesale_analysis(&input, &CalculatorConfig::default()).unwrap();
    assert_eq!(out.result.preferred_offer, dec!(135000));
    assert_eq!(out.result.max_allowable_offer, dec!(177500));
    assert_eq!(out.result.exit_percentage, dec!(0.70));
}

#[test]
fn test_itemized_rehab_with_holding_and_closing() {
    let input = WholesaleInput {
        arv: dec!(180000),
        rehab_cost: dec!(99999),
        holding_cost: dec!(4000),
        closing_cost: dec!(6000),
        rehab_items: vec![
            RehabItem {
                description: "Flooring".into(),
                cost: dec!(9000),
            },
            RehabItem {
                description: "HVAC".into(),
                cost: dec!(7000),
            },
        ],
        ..WholesaleInput::default()
    };
    let out = wholesale_analysis(&input, &CalculatorConfig::default()).unwrap();
    let r = &out.result;
    assert_eq!(r.rehab_source, RehabSource::ItemizedList);
    assert_eq!(r.total_rehab_cost, dec!(16000));
    // 180000 * 0.66 - 16000
    assert_eq!(r.preferred_offer, dec!(102800));
    // fee 9000; price 111800; profit 180000 - 111800 - 16000 - 4000 - 6000
    assert_eq!(r.assignment_fee, dec!(9000));
    assert_eq!(r.investor_profit, dec!(42200));
    assert_eq!(r.minimum_score.map(|s| s.round_dp(4)), Some(dec!(23.4444)));
}

#[test]
fn test_config_drives_heuristics() {
    let config = CalculatorConfig::from_toml_str(
        r#"
        [wholesale]
        preferred_offer_ratio = "0.70"
        max_offer_ratio = "0.80"

        [rehab_table]
        band_limits = ["2000"]
        easy = ["5000", "9000"]
        medium = ["10000", "18000"]
        bad = ["20000", "36000"]
        "#,
    )
    .unwrap();

    let input = WholesaleInput {
        arv: dec!(300000),
        square_footage: dec!(2400),
        condition: RehabCondition::Medium,
        ..WholesaleInput::default()
    };
    let r = wholesale_analysis(&input, &config).unwrap().result;
    assert_eq!(r.total_rehab_cost, dec!(18000));
    assert_eq!(r.preferred_offer, dec!(192000));
    assert_eq!(r.max_allowable_offer, dec!(222000));
    // fee fields not in the file keep their defaults
    assert_eq!(r.assignment_fee, dec!(15000));
}

#[test]
fn test_result_serializes_undefined_as_null() {
    let out = wholesale_analysis(&WholesaleInput::default(), &CalculatorConfig::default()).unwrap();
    let v = serde_json::to_value(&out).unwrap();
    assert!(v["result"]["roi"].is_null());
    assert!(v["result"]["minimum_score"].is_null());
    assert_eq!(v["result"]["rehab_source"], "manual");
    assert_eq!(out.result.investor_profit, Decimal::ZERO);
}
