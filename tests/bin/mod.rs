mod textskel_cli_test;
