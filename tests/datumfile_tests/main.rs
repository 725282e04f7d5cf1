//! Tests for the datum file backend

mod common;
mod db_tests;
