mod link_list_tests;
mod text_parser_tests;
