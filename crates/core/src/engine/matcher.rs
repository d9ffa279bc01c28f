use crate::domain::catalog::RegisteredVehicle;
use crate::domain::quote::VehicleDescription;

/// Find the registered configuration matching the described vehicle: a single
/// conjunctive, case-sensitive equality over all five fields.
///
/// The catalog schema enforces uniqueness of the tuple, so at most one row
/// should ever satisfy it. The engine does not prove that itself: if several
/// rows match, the first one wins. Absence of a match is not an error; it
/// means the vehicle is unregistered and prices with rules only.
pub fn match_configuration<'a>(
    registered: &'a [RegisteredVehicle],
    vehicle: &VehicleDescription,
) -> Option<&'a RegisteredVehicle> {
    registered.iter().find(|candidate| {
        candidate.year == vehicle.year
            && candidate.make == vehicle.make
            && candidate.model == vehicle.model
            && candidate.body_type == vehicle.body_type
            && candidate.size == vehicle.size
    })
}
