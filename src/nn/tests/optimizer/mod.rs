/*
 * @Author       : 老董
 * @Date         : 2026-10-19
 * @Description  : 优化器模块单元测试
 *
 * 测试按功能分组：
 * - adam: Adam 更新公式与学习率衰减
 * - trait_tests: Optimizer trait 通用行为测试
 */

mod adam;
mod trait_tests;
