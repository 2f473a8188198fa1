use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Error)]
pub enum FormError {
    #[error("lot number is required")]
    MissingLotNumber,
    #[error("block is required")]
    MissingBlock,
    #[error("price must be a number greater than 0 (got '{0}')")]
    InvalidPrice(String),
    #[error("area must be a whole number of square meters greater than 0 (got '{0}')")]
    InvalidArea(String),
    #[error("a fractionation plot must be selected")]
    MissingPlot,
    #[error("unknown lot status '{0}'")]
    InvalidStatus(String),
    #[error("plot name is required")]
    MissingPlotName,
    #[error("invalid city id '{0}'")]
    InvalidCity(String),
}

impl FormError {
    /// Name of the form field at fault.
    pub fn field(&self) -> &'static str {
        match self {
            FormError::MissingLotNumber => "numero_lote",
            FormError::MissingBlock => "manzana",
            FormError::InvalidPrice(_) => "precio",
            FormError::InvalidArea(_) => "metros_cuadrados",
            FormError::MissingPlot => "fraccionamiento_id",
            FormError::InvalidStatus(_) => "estado",
            FormError::MissingPlotName => "nombre",
            FormError::InvalidCity(_) => "ciudad_id",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Error)]
pub enum GeometryError {
    #[error("geometry has no coordinates")]
    Empty,
    #[error("geometry has {count} positions, limit is {max}")]
    TooManyPositions { count: usize, max: usize },
    #[error("position {index} has fewer than two components")]
    ShortPosition { index: usize },
    #[error("position {index} is not finite")]
    NonFinite { index: usize },
    #[error("position {index} ({lon}, {lat}) is outside longitude/latitude range")]
    OutOfRange { index: usize, lon: f64, lat: f64 },
}

#[derive(Clone, Debug, PartialEq, Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(String),
    #[error("server responded {status}: {message}")]
    Status { status: u16, message: String },
    #[error("{0}")]
    Rejected(String),
    #[error("could not decode response: {0}")]
    Decode(String),
}

#[derive(Clone, Debug, PartialEq, Error)]
pub enum EditorError {
    #[error(transparent)]
    Form(#[from] FormError),
    #[error(transparent)]
    Geometry(#[from] GeometryError),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("no lot drawn or selected")]
    NoTarget,
    #[error("no saved lot selected")]
    NoSelectedLot,
    #[error("draw the fractionation plot polygon first")]
    NoPlotDraft,
}

impl EditorError {
    /// Stable machine-readable code surfaced to the page.
    pub fn code(&self) -> &'static str {
        match self {
            EditorError::Form(_) => "invalid_form",
            EditorError::Geometry(_) => "invalid_geometry",
            EditorError::Api(ApiError::Network(_)) => "network",
            EditorError::Api(ApiError::Status { .. }) | EditorError::Api(ApiError::Rejected(_)) => "rejected",
            EditorError::Api(ApiError::Decode(_)) => "decode",
            EditorError::NoTarget | EditorError::NoSelectedLot | EditorError::NoPlotDraft => "no_target",
        }
    }
}
