use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BodyTypeId(pub i64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SizeId(pub i64);

/// Identity of one registered vehicle configuration, i.e. one row of the
/// catalog's (make, model, body type, size, year) table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConfigurationId(pub i64);

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BodyType {
    pub id: BodyTypeId,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Size {
    pub id: SizeId,
    pub name: String,
}

/// A registered configuration denormalized to the names the matcher compares
/// against. Reference data: the engine only ever reads these.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisteredVehicle {
    pub id: ConfigurationId,
    pub make: String,
    pub model: String,
    pub body_type: String,
    pub size: String,
    pub year: String,
}
