pub(crate) mod organization_members;
pub(crate) mod organizations;
pub(crate) mod pitches;
pub(crate) mod songs;
pub(crate) mod users;
