//! Integration tests for arbor-validator, run against the shared record
//! graphs in [`fixture`].

mod fixture;

mod registry;
mod report;
mod walk;
