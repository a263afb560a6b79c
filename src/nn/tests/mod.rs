mod graph_backward;
mod graph_describe;
mod model;
mod optimizer; // 优化器测试模块（包含 adam, trait_tests 子模块）
