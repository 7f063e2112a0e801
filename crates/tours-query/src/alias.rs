use crate::params::ParameterMap;

/// A named route that presets control parameters before shaping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Alias {
    pub name: &'static str,
    overrides: &'static [(&'static str, &'static str)],
}

/// Five best-rated tours, cheapest first among equals.
pub const TOP_TOURS: Alias = Alias {
    name: "top-5-cheap",
    overrides: &[
        ("limit", "5"),
        ("sort", "-ratingsAverage,price"),
        ("fields", "name,price,ratingsAverage,summary,difficulty"),
    ],
};

impl Alias {
    /// Overwrite the preset keys on `params`. Filters the caller sent are kept.
    pub fn apply(&self, mut params: ParameterMap) -> ParameterMap {
        for (key, value) in self.overrides {
            params.insert(*key, *value);
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn top_tours_overrides_controls_and_keeps_filters() {
        let params: ParameterMap = [("limit", "50"), ("difficulty", "easy")]
            .into_iter()
            .collect();
        let params = TOP_TOURS.apply(params);
        assert_eq!(params.get_str("limit"), Some("5"));
        assert_eq!(params.get_str("sort"), Some("-ratingsAverage,price"));
        assert_eq!(
            params.get_str("fields"),
            Some("name,price,ratingsAverage,summary,difficulty")
        );
        assert_eq!(params.get_str("difficulty"), Some("easy"));
    }
}
