//! HTTP request handlers for the PuffsIndex API.

pub mod aqi;
pub mod city;
pub mod coordinates;
pub mod health;
pub mod places;
