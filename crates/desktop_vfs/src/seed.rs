//! Fixed seed tree every session starts from.

use crate::node::FsNode;

/// Name of the root folder.
pub const ROOT_NAME: &str = "~";

const HELLO_WORLD_STAR: &str = r#"import React from 'react';

// StarScript applications are React components.
// The default export is rendered by the OS.
export default function HelloWorldApp() {
    const [count, setCount] = React.useState(0);

    return (
        <div style={{ display: 'flex', flexDirection: 'column', alignItems: 'center', gap: '1rem' }}>
            <h1>Hello from StarScript!</h1>
            <p>You clicked {count} times</p>
            <button onClick={() => setCount(c => c + 1)}>Click me</button>
        </div>
    );
}"#;

/// Builds the seed tree.
///
/// ```text
/// ~/
///   home/guest/{Desktop/, Documents/{project-notes.txt, hello-world.star}, Downloads/, welcome.txt}
///   sys/kernel.bin
///   bin/{ls, cat}
/// ```
pub fn seed_tree() -> FsNode {
    FsNode::folder(
        ROOT_NAME,
        [
            FsNode::folder(
                "home",
                [FsNode::folder(
                    "guest",
                    [
                        FsNode::folder("Desktop", []),
                        FsNode::folder(
                            "Documents",
                            [
                                FsNode::file("project-notes.txt", "StarOS project details..."),
                                FsNode::file("hello-world.star", HELLO_WORLD_STAR),
                            ],
                        ),
                        FsNode::folder("Downloads", []),
                        FsNode::file("welcome.txt", "Welcome to StarOS!"),
                    ],
                )],
            ),
            FsNode::folder("sys", [FsNode::file("kernel.bin", "binary_data")]),
            FsNode::folder(
                "bin",
                [
                    FsNode::file("ls", "executable"),
                    FsNode::file("cat", "executable"),
                ],
            ),
        ],
    )
}
