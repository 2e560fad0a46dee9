use layers::UnknownLayerError;

#[derive(Debug, Clone, PartialEq)]
pub enum ViewportError {
    /// The surface has no usable extent yet (not laid out, or zero size).
    UnavailableExtent,
    /// Zoom reported by the surface is not a positive finite number.
    InvalidZoom(f64),
    /// Coordinate with a NaN or infinite component.
    InvalidCoordinate { lon: f64, lat: f64 },
    /// Coordinate field text that does not parse as a number.
    InvalidInput(String),
    UnknownLayer(String),
}

impl std::fmt::Display for ViewportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ViewportError::UnavailableExtent => write!(f, "viewport extent unavailable"),
            ViewportError::InvalidZoom(z) => write!(f, "invalid zoom level: {z}"),
            ViewportError::InvalidCoordinate { lon, lat } => {
                write!(f, "non-finite coordinate: lon={lon} lat={lat}")
            }
            ViewportError::InvalidInput(text) => write!(f, "not a number: {text:?}"),
            ViewportError::UnknownLayer(id) => write!(f, "unknown base layer id: {id:?}"),
        }
    }
}

impl std::error::Error for ViewportError {}

impl From<UnknownLayerError> for ViewportError {
    fn from(e: UnknownLayerError) -> Self {
        ViewportError::UnknownLayer(e.id)
    }
}

impl ViewportError {
    /// Short metric-friendly name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            ViewportError::UnavailableExtent => "unavailable_extent",
            ViewportError::InvalidZoom(_) => "invalid_zoom",
            ViewportError::InvalidCoordinate { .. } => "invalid_coordinate",
            ViewportError::InvalidInput(_) => "invalid_input",
            ViewportError::UnknownLayer(_) => "unknown_layer",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ViewportError;
    use layers::BaseLayer;

    #[test]
    fn unknown_layer_converts_from_parse_error() {
        let err: ViewportError = "terrain".parse::<BaseLayer>().unwrap_err().into();
        assert_eq!(err, ViewportError::UnknownLayer("terrain".to_string()));
        assert_eq!(err.kind(), "unknown_layer");
    }

    #[test]
    fn display_names_the_offending_value() {
        let err = ViewportError::InvalidCoordinate {
            lon: f64::NAN,
            lat: 27.7,
        };
        assert_eq!(err.to_string(), "non-finite coordinate: lon=NaN lat=27.7");
        assert_eq!(
            ViewportError::InvalidInput("abc".into()).to_string(),
            "not a number: \"abc\""
        );
    }
}
