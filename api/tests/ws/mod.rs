mod presence_test;
