pub mod connectivity;
pub mod db;
pub mod remote;
