mod calculate_test;
