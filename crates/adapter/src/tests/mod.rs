//! Unit-Tests fuer den Adapter

mod dispatcher_tests;
