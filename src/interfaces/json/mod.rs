pub mod ledger_reader;
