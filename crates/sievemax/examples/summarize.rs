//! Selects a small representative summary of a 2-d point cloud, once with
//! the offline greedy algorithm and once with the single-pass ThreeSieves
//! stream, and prints both side by side.

use sievemax::{
    FastIvm, Greedy, Optimizer, RbfKernel, Scalar, SelectionResult, ThreeSieves,
    ThresholdStrategy,
};

fn main() -> SelectionResult<()> {
    let data: Vec<Vec<Scalar>> = vec![
        vec![0.0, 0.0],
        vec![1.0, 1.0],
        vec![0.5, 1.0],
        vec![1.0, 0.5],
        vec![0.0, 0.5],
        vec![0.0, 1.5],
        vec![0.0, 1.0],
        vec![0.5, 0.5],
    ];
    let ids: Vec<i64> = (1..=data.len() as i64).collect();

    let k = 3;
    let kernel = RbfKernel::new(2.0_f64.sqrt(), 1.0)?;
    let objective = FastIvm::new(k, &kernel, 1.0)?;

    let mut greedy = Greedy::new(k, &objective)?;
    greedy.fit(&data, Some(&ids), 1)?;
    println!(
        "greedy      value = {:.6}, ids = {:?}, summary = {:?}",
        greedy.value()?,
        greedy.ids()?,
        greedy.solution()?
    );

    let mut streaming = ThreeSieves::new(k, &objective, 1.0, 0.1, ThresholdStrategy::Geometric, 10)?;
    for (x, id) in data.iter().zip(&ids) {
        streaming.offer(x, Some(*id))?;
    }
    println!(
        "three-sieves value = {:.6}, ids = {:?}, summary = {:?}",
        streaming.value()?,
        streaming.ids()?,
        streaming.solution()?
    );

    Ok(())
}
