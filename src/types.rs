use std::{fmt::Display, str::FromStr};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Sentinel for masculine fields (court, roll, price, email).
pub const NOT_SPECIFIED: &str = "No especificado";
/// Sentinel for feminine fields (comuna, dirección).
pub const NOT_SPECIFIED_F: &str = "No especificada";

#[derive(Debug, thiserror::Error)]
#[error("Invalid property type '{0}'. Accepted values: 'Casa', 'Departamento', 'Inmueble'")]
pub struct PropertyTypeParseError(String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PropertyType {
    #[serde(rename = "Casa")]
    House,
    #[serde(rename = "Departamento")]
    Apartment,
    #[serde(rename = "Inmueble")]
    Other,
}

impl PropertyType {
    pub fn label(&self) -> &'static str {
        match self {
            PropertyType::House => "Casa",
            PropertyType::Apartment => "Departamento",
            PropertyType::Other => "Inmueble",
        }
    }
}

impl FromStr for PropertyType {
    type Err = PropertyTypeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "casa" => Ok(PropertyType::House),
            "departamento" => Ok(PropertyType::Apartment),
            "inmueble" => Ok(PropertyType::Other),
            _ => Err(PropertyTypeParseError(s.to_string())),
        }
    }
}

impl Display for PropertyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// One accepted auction, ready for export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuctionRecord {
    pub date: NaiveDate,
    pub time: String,
    pub court: String,
    pub roll: String,
    pub property_type: PropertyType,
    pub comuna: String,
    pub address: String,
    pub min_price: String,
    pub email: String,
    pub description: String,
}

impl AuctionRecord {
    /// Cell values in export column order.
    pub fn to_row(&self) -> [String; crate::export::COLUMNS] {
        [
            self.date.format("%Y-%m-%d").to_string(),
            self.time.clone(),
            self.court.clone(),
            self.roll.clone(),
            self.property_type.to_string(),
            self.comuna.clone(),
            self.address.clone(),
            self.min_price.clone(),
            self.email.clone(),
            self.description.clone(),
        ]
    }
}

impl Display for AuctionRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "┌─ {} {} ─ {} en {}",
            self.date, self.time, self.property_type, self.comuna
        )?;
        writeln!(f, "│  Juzgado:   {}", self.court)?;
        writeln!(f, "│  Rol:       {}", self.roll)?;
        writeln!(f, "│  Dirección: {}", self.address)?;
        writeln!(f, "│  Mínimo:    {}", self.min_price)?;
        write!(f, "└─ Contacto:  {}", self.email)
    }
}
