use std::fmt;

use log::warn;
use serde::Deserialize;
use serde_json::{Map, Value};

use super::error::PredictionError;

/// The two classes the service distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Label {
    Cat,
    Dog,
}

impl Label {
    /// Maps a label as sent by a classifier onto a class.
    ///
    /// Comparison ignores case. Older models answer with a boolean "is it a
    /// cat" flag, so `"true"` also means `Cat`; anything else is a `Dog`.
    pub fn from_wire(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.eq_ignore_ascii_case("cat") || raw.eq_ignore_ascii_case("true") {
            Label::Cat
        } else {
            if !raw.eq_ignore_ascii_case("dog") && !raw.eq_ignore_ascii_case("false") {
                warn!("Unexpected label {:?}, treating it as Dog", raw);
            }
            Label::Dog
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Label::Cat => "Cat",
            Label::Dog => "Dog",
        }
    }

    /// Style class distinguishing the result panel per label
    pub fn css_class(&self) -> &'static str {
        match self {
            Label::Cat => "cat",
            Label::Dog => "dog",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Label::Cat => "🐱",
            Label::Dog => "🐶",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One classification outcome. Confidence is within `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    pub label: Label,
    pub confidence: f32,
}

impl Prediction {
    pub fn new(label: Label, confidence: f32) -> Self {
        Self { label, confidence }
    }

    /// Confidence as a percentage with one decimal place, e.g. `91.0%`
    pub fn percent(&self) -> String {
        format!("{:.1}%", self.confidence * 100.0)
    }
}

/// What the result panel displays for a prediction.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultView {
    pub label: Label,
    pub headline: String,
    pub confidence_text: String,
    pub class_name: String,
}

impl ResultView {
    pub fn label_text(&self) -> &'static str {
        self.label.as_str()
    }
}

impl From<&Prediction> for ResultView {
    fn from(prediction: &Prediction) -> Self {
        let label = prediction.label;
        Self {
            label,
            headline: format!("{} It's a {}!", label.emoji(), label),
            confidence_text: format!("Confidence: {}", prediction.percent()),
            class_name: format!("result {}", label.css_class()),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WireResponse {
    Labeled { label: Value, confidence: f64 },
    Scores(Map<String, Value>),
}

/// Decodes a classifier response body.
///
/// Accepts `{"label": "Dog", "confidence": 0.91}` as well as a label to
/// probability map such as `{"cat": 0.12, "dog": 0.88}`, where the most
/// probable entry wins and a tie goes to `Cat`. A map carrying an `"error"`
/// string is the server's own failure report.
pub fn decode_response(body: &[u8]) -> Result<Prediction, PredictionError> {
    let (label, confidence) = match serde_json::from_slice::<WireResponse>(body)? {
        WireResponse::Labeled { label, confidence } => {
            (Label::from_wire(&label_text(&label)?), confidence)
        }
        WireResponse::Scores(scores) => best_score(scores)?,
    };

    if !confidence.is_finite() || !(0.0..=1.0).contains(&confidence) {
        return Err(PredictionError::DecodeError(format!(
            "confidence {} is outside [0, 1]",
            confidence
        )));
    }

    Ok(Prediction::new(label, confidence as f32))
}

fn label_text(label: &Value) -> Result<String, PredictionError> {
    match label {
        Value::String(s) => Ok(s.clone()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(PredictionError::DecodeError(format!("unsupported label {}", other))),
    }
}

fn best_score(scores: Map<String, Value>) -> Result<(Label, f64), PredictionError> {
    if let Some(Value::String(message)) = scores.get("error") {
        return Err(PredictionError::DecodeError(message.clone()));
    }

    let mut best: Option<(Label, f64)> = None;
    for (raw, value) in &scores {
        let score = value.as_f64().ok_or_else(|| {
            PredictionError::DecodeError(format!("score for {:?} is not a number", raw))
        })?;
        let label = Label::from_wire(raw);
        let wins = match best {
            None => true,
            Some((top_label, top)) => score > top || (score == top && top_label == Label::Dog),
        };
        if wins {
            best = Some((label, score));
        }
    }

    best.ok_or_else(|| PredictionError::DecodeError("response carries no label".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_normalization() {
        assert_eq!(Label::from_wire("Cat"), Label::Cat);
        assert_eq!(Label::from_wire("CAT"), Label::Cat);
        assert_eq!(Label::from_wire("true"), Label::Cat);
        assert_eq!(Label::from_wire("True"), Label::Cat);
        assert_eq!(Label::from_wire("dog"), Label::Dog);
        assert_eq!(Label::from_wire("False"), Label::Dog);
        assert_eq!(Label::from_wire("hamster"), Label::Dog);
    }

    #[test]
    fn test_result_view_for_true_label() {
        let view = ResultView::from(&Prediction::new(Label::from_wire("true"), 0.875));
        assert_eq!(view.label_text(), "Cat");
        assert_eq!(view.headline, "🐱 It's a Cat!");
        assert_eq!(view.confidence_text, "Confidence: 87.5%");
        assert_eq!(view.class_name, "result cat");
    }

    #[test]
    fn test_percent_rounding() {
        assert_eq!(Prediction::new(Label::Dog, 0.91).percent(), "91.0%");
        assert_eq!(Prediction::new(Label::Dog, 1.0).percent(), "100.0%");
        assert_eq!(Prediction::new(Label::Cat, 0.0).percent(), "0.0%");
        assert_eq!(Prediction::new(Label::Cat, 0.6666).percent(), "66.7%");
    }

    #[test]
    fn test_decode_labeled_response() {
        let body = br#"{"label": "Dog", "confidence": 0.91, "model": "v2"}"#;
        let prediction = decode_response(body).unwrap();
        assert_eq!(prediction.label, Label::Dog);
        assert!((prediction.confidence - 0.91).abs() < 1e-6);

        let prediction = decode_response(br#"{"label": true, "confidence": 0.7}"#).unwrap();
        assert_eq!(prediction.label, Label::Cat);
    }

    #[test]
    fn test_decode_score_map() {
        let prediction = decode_response(br#"{"cat": 0.12, "dog": 0.88}"#).unwrap();
        assert_eq!(prediction.label, Label::Dog);
        assert!((prediction.confidence - 0.88).abs() < 1e-6);

        let prediction = decode_response(br#"{"True": 0.97, "False": 0.03}"#).unwrap();
        assert_eq!(prediction.label, Label::Cat);
    }

    #[test]
    fn test_decode_score_map_tie_prefers_cat() {
        for body in [
            &br#"{"cat": 0.5, "dog": 0.5}"#[..],
            &br#"{"dog": 0.5, "cat": 0.5}"#[..],
            &br#"{"False": 0.5, "True": 0.5}"#[..],
        ] {
            for _ in 0..50 {
                let prediction = decode_response(body).unwrap();
                assert_eq!(prediction.label, Label::Cat);
                assert_eq!(prediction.percent(), "50.0%");
            }
        }
    }

    #[test]
    fn test_decode_failures() {
        let cases: [&[u8]; 7] = [
            b"not json",
            b"[1, 2]",
            b"{}",
            br#"{"label": "Dog"}"#,
            br#"{"label": "Dog", "confidence": 1.5}"#,
            br#"{"label": 3, "confidence": 0.5}"#,
            br#"{"cat": "high"}"#,
        ];
        for body in cases {
            let err = decode_response(body).unwrap_err();
            assert!(
                matches!(err, PredictionError::DecodeError(_)),
                "{}",
                String::from_utf8_lossy(body)
            );
        }
    }

    #[test]
    fn test_decode_server_error_report() {
        let err = decode_response(br#"{"error": "cannot identify image file"}"#).unwrap_err();
        match err {
            PredictionError::DecodeError(message) => {
                assert_eq!(message, "cannot identify image file")
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
