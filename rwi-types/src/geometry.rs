use serde::{Deserialize, Serialize};

/// Точка в декартовых координатах сцены (метры).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Пара углов луча: угол места и азимут, в радианах.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AnglePair {
    pub elevation: f64,
    pub azimuth: f64,
}

/// Единицы измерения углов во входном файле.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AngleUnit {
    #[default]
    Radians,
    Degrees,
}

impl Position {
    pub fn new(
        x: f64,
        y: f64,
        z: f64,
    ) -> Self {
        Self { x, y, z }
    }

    pub fn to_array(self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    pub fn distance(
        &self,
        other: &Position,
    ) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2) + (self.z - other.z).powi(2))
            .sqrt()
    }
}

impl AnglePair {
    pub fn new(
        elevation: f64,
        azimuth: f64,
    ) -> Self {
        Self { elevation, azimuth }
    }
}

impl AngleUnit {
    /// Переводит значение из этих единиц в радианы.
    pub fn to_radians(
        self,
        value: f64,
    ) -> f64 {
        match self {
            AngleUnit::Radians => value,
            AngleUnit::Degrees => value.to_radians(),
        }
    }
}

impl From<[f64; 3]> for Position {
    fn from(v: [f64; 3]) -> Self {
        Self::new(v[0], v[1], v[2])
    }
}

/// Три координаты через пробел: `x y z`.
impl std::fmt::Display for Position {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        write!(f, "{} {} {}", self.x, self.y, self.z)
    }
}

impl std::str::FromStr for AngleUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "rad" | "radians" => Ok(AngleUnit::Radians),
            "deg" | "degrees" => Ok(AngleUnit::Degrees),
            _ => Err(format!("Unknown angle unit '{s}'. Use: rad, deg")),
        }
    }
}
