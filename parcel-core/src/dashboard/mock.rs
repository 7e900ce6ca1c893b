use crate::models::{Coordinates, LeverKind, Port, Recommendation, Route, StrategicLever};

fn singapore() -> Port {
    Port {
        id: "1".to_string(),
        name: "Singapore".to_string(),
        country: "Singapore".to_string(),
        region: "Asia".to_string(),
        coordinates: Coordinates {
            lat: 1.3521,
            lng: 103.8198,
        },
        ..Default::default()
    }
}

fn placeholder_port(
    id: &str,
    suffix: &str,
) -> Port {
    Port {
        id: id.to_string(),
        name: format!("Port {suffix}"),
        country: format!("Country {suffix}"),
        region: format!("Region {suffix}"),
        ..Default::default()
    }
}

/// Demonstration routes injected into every successful dashboard load.
pub fn mock_routes() -> Vec<Route> {
    vec![
        Route {
            id: "1".to_string(),
            name: "Port X".to_string(),
            origin_port: singapore(),
            destination_port: placeholder_port("2", "X"),
            distance: 1200.0,
            estimated_days: 16.1,
            base_cost: 206000.0,
            risk_cost: 9000.0,
            p95_cost: 235000.0,
            expected_margin: 15000.0,
            disruption_probability: 25.0,
            recommendation: Recommendation::Avoid,
            savings: -5000.0,
        },
        Route {
            id: "2".to_string(),
            name: "Port Y".to_string(),
            origin_port: singapore(),
            destination_port: placeholder_port("3", "Y"),
            distance: 1100.0,
            estimated_days: 15.4,
            base_cost: 201000.0,
            risk_cost: 4000.0,
            p95_cost: 217000.0,
            expected_margin: 18000.0,
            disruption_probability: 12.0,
            recommendation: Recommendation::Use,
            savings: 5000.0,
        },
    ]
}

fn lever(
    id: &str,
    kind: LeverKind,
    suffix: &str,
    description: &str,
    savings: f64,
    investment: f64,
    roi: f64,
) -> StrategicLever {
    StrategicLever {
        id: id.to_string(),
        kind,
        port: placeholder_port(id, suffix),
        description: description.to_string(),
        potential_savings: savings,
        investment_required: investment,
        roi,
    }
}

/// Demonstration levers shown when the strategic analysis returns none.
pub fn mock_levers() -> Vec<StrategicLever> {
    vec![
        lever(
            "1",
            LeverKind::Relationship,
            "X",
            "Invest in local relationships to reduce bribe frequency",
            15000.0,
            5000.0,
            200.0,
        ),
        lever(
            "2",
            LeverKind::Consolidation,
            "Y",
            "Consolidate volume with alternate carriers for better reliability",
            25000.0,
            8000.0,
            212.5,
        ),
        lever(
            "3",
            LeverKind::Oversight,
            "Z",
            "Implement enhanced oversight to reduce corruption costs",
            12000.0,
            3000.0,
            300.0,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn mock_levers_cover_each_lever_kind() {
        let kinds: Vec<LeverKind> = mock_levers().iter().map(|l| l.kind).collect();

        assert_eq!(
            kinds,
            vec![
                LeverKind::Relationship,
                LeverKind::Consolidation,
                LeverKind::Oversight
            ]
        );
    }

    #[test]
    fn mock_routes_recommend_one_and_avoid_the_other() {
        let routes = mock_routes();

        assert_eq!(routes[0].recommendation, Recommendation::Avoid);
        assert_eq!(routes[1].recommendation, Recommendation::Use);
    }
}
