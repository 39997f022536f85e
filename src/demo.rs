//! The sample artwork the crate ships with.

use crate::params::{Color, FeatureValue, ParameterDefinition, ParameterValue, Parameters};

/// Reads the inlined color and boolean parameters.
pub const MAIN_IMAGE: &str = r"void mainImage( out vec4 fragColor, in vec2 fragCoord )
{
    fragColor = vec4(fx_color_id.rgb, fx_boolean_id ? 1.0 : 0.0);
}
";

// JS `Number.MAX_SAFE_INTEGER`.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

pub fn definitions() -> Vec<ParameterDefinition> {
    vec![
        ParameterDefinition::new(
            "number_id",
            "A number/float64",
            ParameterValue::Number(std::f64::consts::PI),
        )
        .with_range(1.0, 10.0, 0.0001),
        ParameterDefinition::new(
            "bigint_id",
            "A bigint",
            ParameterValue::BigInt(MAX_SAFE_INTEGER as i128 * 2),
        )
        .with_range(-MAX_SAFE_INTEGER * 4.0, MAX_SAFE_INTEGER * 4.0, 1.0),
        ParameterDefinition::new(
            "color_id",
            "A color",
            ParameterValue::Color(Color::new(1.0, 0.0, 0.0, 1.0)),
        ),
        ParameterDefinition::new("boolean_id", "A boolean", ParameterValue::Boolean(true)),
    ]
}

/// Descriptive features for one instance. Draws from `rand` in a fixed
/// order so the same seed reports the same features.
pub fn features(
    mut rand: impl FnMut() -> f64,
    parameters: &Parameters,
) -> Vec<(String, FeatureValue)> {
    const LETTERS: [&str; 4] = ["A", "B", "C", "D"];

    let digit = (rand() * 10.0).floor();
    let coin = rand() > 0.5;
    let letter = LETTERS[((rand() * 4.0).floor() as usize).min(LETTERS.len() - 1)];

    let mut features = vec![
        ("A random feature".to_owned(), FeatureValue::Number(digit)),
        ("A random boolean".to_owned(), FeatureValue::Boolean(coin)),
        ("A random string".to_owned(), FeatureValue::Text(letter.to_owned())),
    ];
    if let Some(ParameterValue::Number(n)) = parameters.get("number_id") {
        features.push((
            "Feature from params, its a number".to_owned(),
            FeatureValue::Number(*n),
        ));
    }
    features
}
