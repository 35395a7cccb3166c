mod integration {
    mod action_tests;
    mod cli_tests;
    mod scan_tests;
    mod smart_tests;
    mod view_tests;
}
