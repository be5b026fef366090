mod people_test;
