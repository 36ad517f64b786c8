mod helpers;

mod account_test;
mod address_test;
