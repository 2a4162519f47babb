//! 环境变量文档生成工具
//!
//! 生成环境变量的Markdown文档

use interface_translator::env;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", env::generate_env_docs());
    Ok(())
}
