// Copyright 2026 Sweep Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! "x of N" constraint: at least `x` facets must match, each within
//! `NEAR/p` of every other chosen facet and of the location phrase. A single
//! NEAR cannot chain more than two terms, so every pair is spelled out.

/// Builds the disjunction of all `x`-facet combinations.
pub fn x_of(required: usize, facets: &[String], location: &str, proximity: u32) -> String {
    let options: Vec<String> = facets
        .iter()
        .filter(|facet| !facet.is_empty())
        .map(|facet| format!("({facet})"))
        .collect();
    if options.is_empty() {
        return format!("(({location}))");
    }
    let required = required.clamp(1, options.len());

    let clauses: Vec<String> = combinations(options.len(), required)
        .into_iter()
        .map(|combo| {
            let mut terms: Vec<&str> = combo.iter().map(|&i| options[i].as_str()).collect();
            terms.push(location);
            combinations(terms.len(), 2)
                .into_iter()
                .map(|pair| format!("{} NEAR/{proximity} {}", terms[pair[0]], terms[pair[1]]))
                .collect::<Vec<_>>()
                .join(" AND ")
        })
        .collect();

    format!("(({}))", clauses.join(") OR ("))
}

/// Index combinations of `k` out of `n`, in lexicographic order.
fn combinations(n: usize, k: usize) -> Vec<Vec<usize>> {
    if k > n {
        return Vec::new();
    }
    let mut out = Vec::new();
    let mut idx: Vec<usize> = (0..k).collect();
    loop {
        out.push(idx.clone());
        let Some(pos) = (0..k).rev().find(|&i| idx[i] != i + n - k) else {
            return out;
        };
        idx[pos] += 1;
        for j in pos + 1..k {
            idx[j] = idx[j - 1] + 1;
        }
    }
}
