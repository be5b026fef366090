mod fixture_test;
mod helpers;
mod mongo_test;
